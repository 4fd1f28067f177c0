use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, Meta, Path, Token, parse_macro_input,
    punctuated::Punctuated,
};

struct BaseEntityConfig {
    traits_path: Path,
    active_model_ident: Ident,
    id_field: Ident,
    created_at_field: Ident,
    updated_at_field: Ident,
    audited: bool,
    created_by_field: Ident,
    last_modified_by_field: Ident,
}

fn ident(name: &str) -> Ident {
    Ident::new(name, proc_macro2::Span::call_site())
}

impl Default for BaseEntityConfig {
    fn default() -> Self {
        Self {
            traits_path: syn::parse_quote!(crate::db::dao::base_traits),
            active_model_ident: ident("ActiveModel"),
            id_field: ident("id"),
            created_at_field: ident("created_at"),
            updated_at_field: ident("updated_at"),
            audited: false,
            created_by_field: ident("created_by"),
            last_modified_by_field: ident("last_modified_by"),
        }
    }
}

/// Injects the primary key and timestamp columns shared by every stored
/// record, and with `audited` the `created_by` / `last_modified_by` user
/// references. Also implements the DAO helper traits for the entity.
///
/// Fields already declared on the struct are left untouched.
#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut config = BaseEntityConfig::default();
    if let Err(err) = apply_args(&mut config, args) {
        return err.to_compile_error().into();
    }

    let mut input = parse_macro_input!(item as ItemStruct);
    let fields = match &mut input.fields {
        Fields::Named(fields) => fields,
        _ => {
            return syn::Error::new_spanned(
                input,
                "base_entity requires a struct with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let existing: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| ident.to_string()))
        .collect();
    let missing = |name: &Ident| !existing.contains(&name.to_string());

    let mut leading: Punctuated<Field, Token![,]> = Punctuated::new();
    let mut trailing: Punctuated<Field, Token![,]> = Punctuated::new();

    if missing(&config.id_field) {
        let id_ident = &config.id_field;
        leading.push(syn::parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub #id_ident: uuid::Uuid
        });
    }

    if missing(&config.created_at_field) {
        let created_ident = &config.created_at_field;
        leading.push(syn::parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub #created_ident: sea_orm::entity::prelude::DateTimeWithTimeZone
        });
    }

    if missing(&config.updated_at_field) {
        let updated_ident = &config.updated_at_field;
        leading.push(syn::parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub #updated_ident: sea_orm::entity::prelude::DateTimeWithTimeZone
        });
    }

    // Audit references are plain ids: no relation, no cascade.
    if config.audited {
        if missing(&config.created_by_field) {
            let created_by = &config.created_by_field;
            trailing.push(syn::parse_quote! {
                #[sea_orm(indexed)]
                pub #created_by: uuid::Uuid
            });
        }
        if missing(&config.last_modified_by_field) {
            let last_modified_by = &config.last_modified_by_field;
            trailing.push(syn::parse_quote! {
                pub #last_modified_by: uuid::Uuid
            });
        }
    }

    let mut new_fields = leading;
    for field in fields.named.iter().cloned() {
        new_fields.push(field);
    }
    for field in trailing {
        new_fields.push(field);
    }
    fields.named = new_fields;

    let traits_path = &config.traits_path;
    let active_model = &config.active_model_ident;
    let id_field = &config.id_field;
    let created_at_field = &config.created_at_field;
    let updated_at_field = &config.updated_at_field;

    let audit_impl = if config.audited {
        let created_by = &config.created_by_field;
        let last_modified_by = &config.last_modified_by_field;
        quote! {
            impl #traits_path::AuditedActiveModel for #active_model {
                fn set_created_by(&mut self, user_id: uuid::Uuid) {
                    self.#created_by = sea_orm::ActiveValue::Set(user_id);
                }

                fn set_last_modified_by(&mut self, user_id: uuid::Uuid) {
                    self.#last_modified_by = sea_orm::ActiveValue::Set(user_id);
                }
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        #input

        impl #traits_path::HasIdActiveModel for #active_model {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.#id_field = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits_path::TimestampedActiveModel for #active_model {
            fn set_created_at(
                &mut self,
                ts: sea_orm::entity::prelude::DateTimeWithTimeZone,
            ) {
                self.#created_at_field = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(
                &mut self,
                ts: sea_orm::entity::prelude::DateTimeWithTimeZone,
            ) {
                self.#updated_at_field = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl #traits_path::BaseColumns for Entity {
            fn id_column() -> Column {
                Column::Id
            }

            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        #audit_impl
    };

    expanded.into()
}

fn apply_args(
    config: &mut BaseEntityConfig,
    args: Punctuated<Meta, Token![,]>,
) -> Result<(), syn::Error> {
    for meta in args {
        let name_value = match meta {
            Meta::Path(path) if path.is_ident("audited") => {
                config.audited = true;
                continue;
            }
            Meta::NameValue(name_value) => name_value,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected `audited` or a name-value pair, e.g. traits = \"path::to::traits\"",
                ));
            }
        };

        let Some(key) = name_value.path.get_ident() else {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "expected identifier for attribute key",
            ));
        };

        let value = match name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) => lit_str,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal for attribute value",
                ));
            }
        };

        match key.to_string().as_str() {
            "traits" => {
                config.traits_path = value.parse::<Path>().map_err(|err| {
                    syn::Error::new(value.span(), format!("invalid traits path: {err}"))
                })?;
            }
            "active_model" => {
                config.active_model_ident = Ident::new(&value.value(), value.span());
            }
            "id" => config.id_field = Ident::new(&value.value(), value.span()),
            "created_at" => config.created_at_field = Ident::new(&value.value(), value.span()),
            "updated_at" => config.updated_at_field = Ident::new(&value.value(), value.span()),
            "created_by" => config.created_by_field = Ident::new(&value.value(), value.span()),
            "last_modified_by" => {
                config.last_modified_by_field = Ident::new(&value.value(), value.span());
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    key,
                    "unknown base_entity attribute key",
                ));
            }
        }
    }

    Ok(())
}
