use sea_orm::ActiveEnum;
use uuid::Uuid;

use super::{ClientResult, PackagingApi};
use crate::{
    db::entities::types::{ConformityDeclaration, PackagingStatus, PpwrLevel},
    services::{
        packaging_service::PackagingInput,
        views::{PackagingView, ProductRef},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormTab {
    #[default]
    Information,
    Components,
    Documents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryList {
    Assembly,
    Sales,
}

/// Unsaved edits to one packaging record. Nothing is sent until
/// [`PackagingDraft::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingDraft {
    id: Option<Uuid>,
    tab: FormTab,
    pub designation: String,
    pub internal_id: String,
    pub gtin_article_number: String,
    pub weight: String,
    pub status: PackagingStatus,
    pub conformity_declaration: ConformityDeclaration,
    country_of_assembly: Vec<String>,
    sales_countries: Vec<String>,
    materials: Vec<String>,
    ppwr_levels: Vec<PpwrLevel>,
    assigned_products: Vec<ProductRef>,
}

impl Default for PackagingDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PackagingDraft {
    /// Blank draft for a new record.
    pub fn new() -> Self {
        Self {
            id: None,
            tab: FormTab::default(),
            designation: String::new(),
            internal_id: String::new(),
            gtin_article_number: String::new(),
            weight: String::new(),
            status: PackagingStatus::Draft,
            conformity_declaration: ConformityDeclaration::NotAvailable,
            country_of_assembly: Vec::new(),
            sales_countries: Vec::new(),
            materials: Vec::new(),
            ppwr_levels: Vec::new(),
            assigned_products: Vec::new(),
        }
    }

    /// Draft editing an existing record.
    pub fn from_record(record: &PackagingView) -> Self {
        Self {
            id: Some(record.id),
            tab: FormTab::default(),
            designation: record.designation.clone(),
            internal_id: record.internal_id.clone(),
            gtin_article_number: record.gtin_article_number.clone(),
            weight: record.weight.clone(),
            status: record.status,
            conformity_declaration: record.conformity_declaration,
            country_of_assembly: record.country_of_assembly.clone(),
            sales_countries: record.sales_countries.clone(),
            materials: record.materials.clone(),
            ppwr_levels: record.ppwr_levels.clone(),
            assigned_products: record.assigned_products.clone(),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn tab(&self) -> FormTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: FormTab) {
        self.tab = tab;
    }

    pub fn countries(&self, list: CountryList) -> &[String] {
        match list {
            CountryList::Assembly => &self.country_of_assembly,
            CountryList::Sales => &self.sales_countries,
        }
    }

    pub fn add_country(&mut self, list: CountryList, country: &str) {
        push_unique(self.countries_mut(list), country.to_string());
    }

    pub fn remove_country(&mut self, list: CountryList, country: &str) {
        self.countries_mut(list).retain(|entry| entry != country);
    }

    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn add_material(&mut self, material: &str) {
        push_unique(&mut self.materials, material.to_string());
    }

    pub fn remove_material(&mut self, material: &str) {
        self.materials.retain(|entry| entry != material);
    }

    pub fn ppwr_levels(&self) -> &[PpwrLevel] {
        &self.ppwr_levels
    }

    pub fn add_ppwr_level(&mut self, level: PpwrLevel) {
        push_unique(&mut self.ppwr_levels, level);
    }

    pub fn remove_ppwr_level(&mut self, level: PpwrLevel) {
        self.ppwr_levels.retain(|entry| *entry != level);
    }

    pub fn assigned_products(&self) -> &[ProductRef] {
        &self.assigned_products
    }

    /// No-op when the product is already assigned.
    pub fn add_product(&mut self, product: ProductRef) {
        if !self.assigned_products.iter().any(|p| p.id == product.id) {
            self.assigned_products.push(product);
        }
    }

    pub fn remove_product(&mut self, id: Uuid) {
        self.assigned_products.retain(|product| product.id != id);
    }

    /// The full create/update body for the current edits.
    pub fn payload(&self) -> PackagingInput {
        PackagingInput {
            designation: Some(self.designation.clone()),
            internal_id: Some(self.internal_id.clone()),
            gtin_article_number: Some(self.gtin_article_number.clone()),
            country_of_assembly: Some(self.country_of_assembly.clone()),
            sales_countries: Some(self.sales_countries.clone()),
            materials: Some(self.materials.clone()),
            status: Some(self.status.to_value()),
            weight: Some(self.weight.clone()),
            ppwr_levels: Some(self.ppwr_levels.iter().map(ActiveEnum::to_value).collect()),
            conformity_declaration: Some(self.conformity_declaration.to_value()),
            assigned_products: Some(
                self.assigned_products
                    .iter()
                    .map(|product| product.id.to_string())
                    .collect(),
            ),
        }
    }

    /// Creates or updates the record. On success the draft is reseeded from
    /// the saved record; on failure it is left as it was.
    pub async fn submit<A: PackagingApi + ?Sized>(&mut self, api: &A) -> ClientResult<PackagingView> {
        let payload = self.payload();
        let saved = match self.id {
            None => api.create_packaging(&payload).await?,
            Some(id) => api.update_packaging(id, &payload).await?,
        };

        let tab = self.tab;
        *self = Self::from_record(&saved);
        self.tab = tab;
        Ok(saved)
    }

    fn countries_mut(&mut self, list: CountryList) -> &mut Vec<String> {
        match list {
            CountryList::Assembly => &mut self.country_of_assembly,
            CountryList::Sales => &mut self.sales_countries,
        }
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::{CountryList, FormTab, PackagingDraft};
    use crate::client::{ClientError, ClientResult, ListPage, PackagingApi, PackagingQuery};
    use crate::db::entities::types::{ConformityDeclaration, PackagingStatus, PpwrLevel};
    use crate::services::{
        packaging_service::PackagingInput,
        views::{PackagingView, ProductRef},
    };

    fn product(name: &str) -> ProductRef {
        ProductRef {
            id: Uuid::new_v4(),
            name: name.to_string(),
            product_id: format!("P-{name}"),
        }
    }

    fn view_from(id: Uuid, payload: &PackagingInput) -> PackagingView {
        let new = payload.validate().expect("payload should be valid");
        PackagingView {
            id,
            designation: new.designation,
            internal_id: new.internal_id,
            gtin_article_number: new.gtin_article_number,
            country_of_assembly: new.country_of_assembly,
            sales_countries: new.sales_countries,
            materials: new.materials,
            status: new.status,
            weight: new.weight,
            ppwr_levels: new.ppwr_levels,
            conformity_declaration: new.conformity_declaration,
            assigned_products: Vec::new(),
            created_by: None,
            last_modified_by: None,
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
        }
    }

    /// Records calls; fails every write when `fail` is set.
    #[derive(Default)]
    struct FakePackagingApi {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl PackagingApi for FakePackagingApi {
        async fn list_packaging(&self, _query: &PackagingQuery) -> ClientResult<ListPage<PackagingView>> {
            unreachable!("draft never lists")
        }

        async fn get_packaging(&self, _id: Uuid) -> ClientResult<PackagingView> {
            unreachable!("draft never fetches")
        }

        async fn create_packaging(&self, payload: &PackagingInput) -> ClientResult<PackagingView> {
            self.calls.lock().expect("lock").push("create".to_string());
            if self.fail {
                return Err(ClientError::Api {
                    status: 400,
                    message: "Validation failed".to_string(),
                    errors: Vec::new(),
                });
            }
            Ok(view_from(Uuid::new_v4(), payload))
        }

        async fn update_packaging(
            &self,
            id: Uuid,
            payload: &PackagingInput,
        ) -> ClientResult<PackagingView> {
            self.calls.lock().expect("lock").push(format!("update {id}"));
            Ok(view_from(id, payload))
        }

        async fn delete_packaging(&self, _id: Uuid) -> ClientResult<()> {
            unreachable!("draft never deletes")
        }
    }

    fn filled() -> PackagingDraft {
        let mut draft = PackagingDraft::new();
        draft.designation = "Becher".to_string();
        draft.internal_id = "X1".to_string();
        draft.gtin_article_number = "G1".to_string();
        draft.weight = "100g".to_string();
        draft.add_country(CountryList::Assembly, "DE");
        draft.add_country(CountryList::Sales, "DE");
        draft.add_material("PET");
        draft
    }

    #[test]
    fn new_draft_has_create_defaults() {
        let draft = PackagingDraft::new();
        assert!(draft.is_new());
        assert_eq!(draft.tab(), FormTab::Information);
        assert_eq!(draft.status, PackagingStatus::Draft);
        assert_eq!(draft.conformity_declaration, ConformityDeclaration::NotAvailable);
    }

    #[test]
    fn list_edits_ignore_duplicates_and_remove_by_value() {
        let mut draft = filled();
        draft.add_country(CountryList::Sales, "FR");
        draft.add_country(CountryList::Sales, "DE");
        draft.remove_country(CountryList::Sales, "DE");
        assert_eq!(draft.countries(CountryList::Sales), ["FR".to_string()]);
        assert_eq!(draft.countries(CountryList::Assembly), ["DE".to_string()]);

        draft.add_ppwr_level(PpwrLevel::LevelB);
        draft.add_ppwr_level(PpwrLevel::LevelB);
        draft.add_ppwr_level(PpwrLevel::SalesBan);
        draft.remove_ppwr_level(PpwrLevel::LevelB);
        assert_eq!(draft.ppwr_levels(), [PpwrLevel::SalesBan]);

        let cup = product("Cup");
        draft.add_product(cup.clone());
        draft.add_product(cup.clone());
        assert_eq!(draft.assigned_products().len(), 1);
        draft.remove_product(cup.id);
        assert!(draft.assigned_products().is_empty());
    }

    #[test]
    fn payload_carries_every_field() {
        let mut draft = filled();
        let cup = product("Cup");
        draft.add_product(cup.clone());
        draft.add_ppwr_level(PpwrLevel::LevelA);

        let payload = draft.payload();
        assert_eq!(payload.status.as_deref(), Some("draft"));
        assert_eq!(payload.ppwr_levels, Some(vec!["levelA".to_string()]));
        assert_eq!(payload.conformity_declaration.as_deref(), Some("notAvailable"));
        assert_eq!(payload.assigned_products, Some(vec![cup.id.to_string()]));
        assert!(payload.validate().is_ok());
    }

    #[tokio::test]
    async fn submit_creates_then_updates() {
        let api = FakePackagingApi::default();
        let mut draft = filled();
        draft.set_tab(FormTab::Documents);

        let created = draft.submit(&api).await.expect("create");
        assert_eq!(draft.id(), Some(created.id));
        assert_eq!(draft.tab(), FormTab::Documents);

        draft.weight = "250g".to_string();
        let updated = draft.submit(&api).await.expect("update");
        assert_eq!(updated.weight, "250g");

        let calls = api.calls.lock().expect("lock").clone();
        assert_eq!(calls, vec!["create".to_string(), format!("update {}", created.id)]);
    }

    #[tokio::test]
    async fn failed_submit_leaves_draft_untouched() {
        let api = FakePackagingApi {
            fail: true,
            ..FakePackagingApi::default()
        };
        let mut draft = filled();
        let before = draft.clone();

        let err = draft.submit(&api).await.expect_err("submit should fail");
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert_eq!(draft, before);
    }
}
