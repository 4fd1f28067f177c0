use sea_orm::{ActiveEnum, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, PackagingDao, PackagingFilter, Page, ProductDao, UserDao, search_key},
    db::entities::{
        packaging,
        types::{
            ConformityDeclaration, IdList, PackagingStatus, PpwrLevel, PpwrLevelList, StringList,
            parse_active_enum,
        },
    },
    error::{AppError, SERVER_ERROR},
    services::{
        crud_service::{CrudMessages, CrudOp, CrudService, UniqueField},
        validation::{FieldErrors, ListParams, PageRequest, normalize_search},
        views::PackagingView,
    },
};

pub const PACKAGING_NOT_FOUND: &str = "Packaging not found";
const INTERNAL_ID_TAKEN: &str = "Internal ID already exists";

const PACKAGING_MESSAGES: CrudMessages = CrudMessages {
    title: "Packaging",
    noun: "packaging",
    unique: Some(UniqueField {
        field: "internalId",
        message: INTERNAL_ID_TAKEN,
    }),
};

/// Create/update body. Every field is optional so an update can carry only
/// what changed; enums and ids stay strings until validated so each bad
/// value is reported against its own field. Audit fields in the body are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackagingInput {
    pub designation: Option<String>,
    pub internal_id: Option<String>,
    pub gtin_article_number: Option<String>,
    pub country_of_assembly: Option<Vec<String>>,
    pub sales_countries: Option<Vec<String>>,
    pub materials: Option<Vec<String>>,
    pub status: Option<String>,
    pub weight: Option<String>,
    pub ppwr_levels: Option<Vec<String>>,
    pub conformity_declaration: Option<String>,
    pub assigned_products: Option<Vec<String>>,
}

/// A packaging record that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPackaging {
    pub designation: String,
    pub internal_id: String,
    pub gtin_article_number: String,
    pub country_of_assembly: Vec<String>,
    pub sales_countries: Vec<String>,
    pub materials: Vec<String>,
    pub status: PackagingStatus,
    pub weight: String,
    pub ppwr_levels: Vec<PpwrLevel>,
    pub conformity_declaration: ConformityDeclaration,
    pub assigned_products: Vec<Uuid>,
}

impl PackagingInput {
    pub fn validate(&self) -> Result<NewPackaging, AppError> {
        let mut errors = FieldErrors::new();
        let new = NewPackaging {
            designation: errors.required_text(
                "designation",
                "Designation",
                self.designation.as_deref(),
            ),
            internal_id: errors.required_text(
                "internalId",
                "Internal ID",
                self.internal_id.as_deref(),
            ),
            gtin_article_number: errors.required_text(
                "gtinArticleNumber",
                "GTIN / article number",
                self.gtin_article_number.as_deref(),
            ),
            country_of_assembly: errors
                .text_list("countryOfAssembly", self.country_of_assembly.as_deref()),
            sales_countries: errors.text_list("salesCountries", self.sales_countries.as_deref()),
            materials: errors.text_list("materials", self.materials.as_deref()),
            status: errors.enum_value("status", self.status.as_deref(), PackagingStatus::default()),
            weight: errors.required_text("weight", "Weight", self.weight.as_deref()),
            ppwr_levels: errors.enum_list("ppwrLevels", self.ppwr_levels.as_deref()),
            conformity_declaration: errors.enum_value(
                "conformityDeclaration",
                self.conformity_declaration.as_deref(),
                ConformityDeclaration::default(),
            ),
            assigned_products: errors
                .id_list("assignedProducts", self.assigned_products.as_deref()),
        };
        errors.finish()?;
        Ok(new)
    }

    /// Fills every absent field from `stored`, yielding the full record an
    /// update would write.
    pub fn merge_onto(self, stored: &packaging::Model) -> Self {
        Self {
            designation: self.designation.or_else(|| Some(stored.designation.clone())),
            internal_id: self.internal_id.or_else(|| Some(stored.internal_id.clone())),
            gtin_article_number: self
                .gtin_article_number
                .or_else(|| Some(stored.gtin_article_number.clone())),
            country_of_assembly: self
                .country_of_assembly
                .or_else(|| Some(stored.country_of_assembly.0.clone())),
            sales_countries: self
                .sales_countries
                .or_else(|| Some(stored.sales_countries.0.clone())),
            materials: self.materials.or_else(|| Some(stored.materials.0.clone())),
            status: self.status.or_else(|| Some(stored.status.to_value())),
            weight: self.weight.or_else(|| Some(stored.weight.clone())),
            ppwr_levels: self.ppwr_levels.or_else(|| {
                Some(stored.ppwr_levels.0.iter().map(ActiveEnum::to_value).collect())
            }),
            conformity_declaration: self
                .conformity_declaration
                .or_else(|| Some(stored.conformity_declaration.to_value())),
            assigned_products: self.assigned_products.or_else(|| {
                Some(
                    stored
                        .assigned_products
                        .0
                        .iter()
                        .map(Uuid::to_string)
                        .collect(),
                )
            }),
        }
    }
}

impl NewPackaging {
    fn write_to(self, active: &mut packaging::ActiveModel) {
        active.search_key = Set(search_key(&[&self.designation, &self.internal_id]));
        active.designation = Set(self.designation);
        active.internal_id = Set(self.internal_id);
        active.gtin_article_number = Set(self.gtin_article_number);
        active.country_of_assembly = Set(StringList(self.country_of_assembly));
        active.sales_countries = Set(StringList(self.sales_countries));
        active.materials = Set(StringList(self.materials));
        active.status = Set(self.status);
        active.weight = Set(self.weight);
        active.ppwr_levels = Set(PpwrLevelList(self.ppwr_levels));
        active.conformity_declaration = Set(self.conformity_declaration);
        active.assigned_products = Set(IdList(self.assigned_products));
    }
}

impl IntoActiveModel<packaging::ActiveModel> for NewPackaging {
    fn into_active_model(self) -> packaging::ActiveModel {
        let mut active = packaging::ActiveModel::default();
        self.write_to(&mut active);
        active
    }
}

/// `status=all` or an empty status means no status filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<PackagingStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => parse_active_enum::<PackagingStatus>(raw)
            .map(Some)
            .ok_or_else(|| AppError::invalid_field("status", format!("Invalid value '{raw}'"))),
    }
}

#[derive(Clone)]
pub struct PackagingService {
    packaging_dao: PackagingDao,
    user_dao: UserDao,
    product_dao: ProductDao,
}

impl CrudService for PackagingService {
    type Dao = PackagingDao;

    fn dao(&self) -> &Self::Dao {
        &self.packaging_dao
    }

    fn messages(&self) -> CrudMessages {
        PACKAGING_MESSAGES
    }
}

impl PackagingService {
    pub fn new(packaging_dao: PackagingDao, user_dao: UserDao, product_dao: ProductDao) -> Self {
        Self {
            packaging_dao,
            user_dao,
            product_dao,
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<PackagingView>, AppError> {
        let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;
        let filter = PackagingFilter {
            status: parse_status_filter(params.status.as_deref())?,
            search: normalize_search(params.search.as_deref()),
        };

        let mut page = self
            .packaging_dao
            .list(&filter, request.page, request.limit)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;

        let views = self.resolve_all(std::mem::take(&mut page.items)).await?;
        Ok(page.with_items(views))
    }

    pub async fn find(&self, id: Uuid) -> Result<PackagingView, AppError> {
        let model = CrudService::find_by_id(self, id).await?;
        self.resolve_one(model).await
    }

    pub async fn create(
        &self,
        actor: Uuid,
        input: &PackagingInput,
    ) -> Result<PackagingView, AppError> {
        let new = input.validate()?;
        self.ensure_internal_id_free(&new.internal_id, None).await?;

        let model = self.create_as(actor, new).await?;
        tracing::info!(packaging_id = %model.id, internal_id = %model.internal_id, "packaging created");

        self.resolve_one(model).await
    }

    /// Applies `input` over the stored record; absent fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        actor: Uuid,
        input: PackagingInput,
    ) -> Result<PackagingView, AppError> {
        let stored = CrudService::find_by_id(self, id).await?;
        let new = input.merge_onto(&stored).validate()?;
        if new.internal_id != stored.internal_id {
            self.ensure_internal_id_free(&new.internal_id, Some(id)).await?;
        }

        let model = self
            .update_as(id, actor, move |active| new.write_to(active))
            .await?;

        self.resolve_one(model).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        CrudService::delete(self, id).await?;
        tracing::info!(packaging_id = %id, "packaging deleted");
        Ok(())
    }

    async fn ensure_internal_id_free(
        &self,
        internal_id: &str,
        except: Option<Uuid>,
    ) -> Result<(), AppError> {
        let existing = self
            .packaging_dao
            .find_by_internal_id(internal_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;

        match existing {
            Some(existing) if Some(existing.id) != except => {
                Err(AppError::invalid_field("internalId", INTERNAL_ID_TAKEN))
            }
            _ => Ok(()),
        }
    }

    async fn resolve_one(&self, model: packaging::Model) -> Result<PackagingView, AppError> {
        let mut views = self.resolve_all(vec![model]).await?;
        views.pop().ok_or_else(|| AppError::internal(SERVER_ERROR))
    }

    /// Loads the users and products referenced by `models` in one query each
    /// and builds the views.
    async fn resolve_all(
        &self,
        models: Vec<packaging::Model>,
    ) -> Result<Vec<PackagingView>, AppError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<Uuid> = Vec::new();
        let mut product_ids: Vec<Uuid> = Vec::new();
        for model in &models {
            for id in [model.created_by, model.last_modified_by] {
                if !user_ids.contains(&id) {
                    user_ids.push(id);
                }
            }
            for id in &model.assigned_products.0 {
                if !product_ids.contains(id) {
                    product_ids.push(*id);
                }
            }
        }

        let users = self
            .user_dao
            .find_by_ids(&user_ids)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;
        let products = self
            .product_dao
            .find_by_ids(&product_ids)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;

        Ok(models
            .into_iter()
            .map(|model| PackagingView::resolve(model, &users, &products))
            .collect())
    }
}
