use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{EnumIter, EnumString, IntoStaticStr};
use tracing::info;
use validator::Validate;

use super::{decimal_null_as_zero, null_as_default};
use crate::client::ApiClient;
use crate::errors::AdminResult;
use crate::resource::{Resource, ResourceKind};
use crate::validation::{validate_non_negative_decimal, validate_required_text};

/// Tea categories offered in the shop. The wire value is the short name; the
/// label describes the processing style.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ProductCategory {
    #[serde(rename = "Herbal Tea")]
    #[strum(to_string = "Herbal Tea", serialize = "herbal")]
    HerbalTea,
    #[serde(rename = "Black Tea")]
    #[strum(to_string = "Black Tea", serialize = "black")]
    BlackTea,
    #[serde(rename = "Oolong Tea")]
    #[strum(to_string = "Oolong Tea", serialize = "oolong")]
    OolongTea,
    #[serde(rename = "Yellow Tea")]
    #[strum(to_string = "Yellow Tea", serialize = "yellow")]
    YellowTea,
    #[serde(rename = "Lemon Tea")]
    #[strum(to_string = "Lemon Tea", serialize = "lemon")]
    LemonTea,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HerbalTea => "Herbal Infusion",
            Self::BlackTea => "Fully Oxidized Tea",
            Self::OolongTea => "Semi-Oxidized Tea",
            Self::YellowTea => "Lightly Fermented Tea",
            Self::LemonTea => "Flavored Tea",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "decimal_null_as_zero"
    )]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[serde(default)]
    #[validate(required)]
    pub category: Option<ProductCategory>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(required, custom = "validate_non_negative_decimal")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image: Option<String>,
    /// Local file uploaded to the image store before the product is saved.
    #[serde(skip)]
    pub image_file: Option<PathBuf>,
}

#[async_trait]
impl Resource for Product {
    const KIND: ResourceKind = ResourceKind::Products;
    type Form = ProductForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> ProductForm {
        ProductForm {
            name: self.name.clone(),
            category: self.category,
            price: Some(self.price),
            description: self.description.clone(),
            image: Some(self.image.clone()).filter(|url| !url.is_empty()),
            image_file: None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        if let Some(category) = &self.category {
            fields.push(category.as_str());
        }
        fields
    }

    fn carry_local_fields(from: &ProductForm, into: &mut ProductForm) {
        if into.image_file.is_none() {
            into.image_file = from.image_file.clone();
        }
    }

    fn attach_image(form: &mut ProductForm, path: PathBuf) -> AdminResult<()> {
        form.image_file = Some(path);
        Ok(())
    }

    fn summary_line(&self) -> String {
        let category = self.category.map(|c| c.as_str()).unwrap_or("-");
        format!("{} | {} | {} | {}", self.id, self.name, category, self.price)
    }

    async fn prepare(form: &mut ProductForm, client: &ApiClient) -> AdminResult<()> {
        if let Some(path) = form.image_file.take() {
            let url = client.upload_image(&path).await?;
            info!(image = %url, "Product image uploaded");
            form.image = Some(url);
        } else if form.image.as_deref().map_or(true, str::is_empty) {
            form.image = Some(client.config().placeholder_image_url.clone());
        }
        Ok(())
    }
}
