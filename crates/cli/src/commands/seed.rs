//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: Chips
//!     description: Crunchy things
//!     sort_order: 1
//!     products:
//!       - name: Sea Salt Chips
//!         price: "3.50"
//!         stock: 40
//!         image_url: https://cdn.example.com/chips.png
//!       - name: Chili Chips
//!         price: "3.80"
//!         on_sale: false
//! ```
//!
//! Categories are matched by name (case-insensitive) and reused when they
//! already exist; every product is created. The whole file is validated
//! before the first backend call.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use snackshop_core::models::{Category, CategoryInput, ProductInput};
use snackshop_core::{AuthToken, ProductStatus, Validate};
use snackshop_core::api::ApiClient;
use tracing::{error, info, warn};

use super::{CliError, admin_token, client};

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

/// A category and the products to create in it.
#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// A product to create.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "on_sale_default")]
    pub on_sale: bool,
}

const fn on_sale_default() -> bool {
    true
}

impl SeedProduct {
    fn to_input(&self, category: Option<&Category>) -> ProductInput {
        ProductInput {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            image_url: self.image_url.clone(),
            category_id: category.map(|c| c.id),
            status: if self.on_sale {
                ProductStatus::OnSale
            } else {
                ProductStatus::OffSale
            },
        }
    }
}

impl SeedCategory {
    fn to_input(&self) -> CategoryInput {
        CategoryInput {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Counts reported after seeding.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_reused: usize,
    pub products_created: usize,
    pub products_failed: usize,
}

/// Every validation problem in the file, labelled by entry.
#[must_use]
pub fn validate_file(seed: &SeedFile) -> Vec<String> {
    let mut problems = Vec::new();
    for category in &seed.categories {
        if let Err(errors) = category.to_input().validate() {
            problems.push(format!("category {:?}: {errors}", category.name));
        }
        for product in &category.products {
            if let Err(errors) = product.to_input(None).validate() {
                problems.push(format!(
                    "product {:?} in {:?}: {errors}",
                    product.name, category.name
                ));
            }
        }
    }
    problems
}

/// Parse a seed file from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML does not match the seed shape.
pub fn parse(content: &str) -> Result<SeedFile, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

fn find_category<'a>(existing: &'a [Category], name: &str) -> Option<&'a Category> {
    existing
        .iter()
        .find(|c| c.name.trim().eq_ignore_ascii_case(name.trim()))
}

/// Create the file's categories and products.
///
/// A product the backend refuses is logged and skipped; a category the
/// backend refuses aborts the run.
///
/// # Errors
///
/// Returns an error if listing or creating a category fails.
pub async fn apply(
    api: &ApiClient,
    token: &AuthToken,
    seed: &SeedFile,
) -> Result<SeedSummary, CliError> {
    let mut existing = api.categories().await?;
    let mut summary = SeedSummary::default();

    for seed_category in &seed.categories {
        let category = if let Some(found) = find_category(&existing, &seed_category.name) {
            info!(category = %found.name, id = %found.id, "Reusing category");
            summary.categories_reused += 1;
            found.clone()
        } else {
            let created = api
                .create_category(token, &seed_category.to_input())
                .await?;
            info!(category = %created.name, id = %created.id, "Created category");
            summary.categories_created += 1;
            existing.push(created.clone());
            created
        };

        for product in &seed_category.products {
            let input = product.to_input(Some(&category));
            match api.create_product(token, &input).await {
                Ok(created) => {
                    info!(product = %created.name, id = %created.id, "Created product");
                    summary.products_created += 1;
                }
                Err(e) => {
                    warn!(product = %input.name, error = %e, "Backend refused product");
                    summary.products_failed += 1;
                }
            }
        }
    }

    Ok(summary)
}

/// Seed the catalog from `file_path`.
///
/// With `dry_run` the file is only parsed and validated.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation,
/// or a backend call fails.
pub async fn run(file_path: &str, dry_run: bool) -> Result<(), CliError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading seed file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: file_path.to_string(),
            source,
        })?;
    let seed = parse(&content)?;

    let problems = validate_file(&seed);
    if !problems.is_empty() {
        error!("Seed file validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CliError::InvalidSeed(problems.len()));
    }

    let product_count: usize = seed.categories.iter().map(|c| c.products.len()).sum();
    info!(
        categories = seed.categories.len(),
        products = product_count,
        "Seed file is valid"
    );
    if dry_run {
        info!("Dry run, nothing sent to the backend");
        return Ok(());
    }

    let api = client()?;
    let token = admin_token()?;
    let summary = apply(&api, &token, &seed).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Categories reused: {}", summary.categories_reused);
    info!("  Products created: {}", summary.products_created);
    if summary.products_failed > 0 {
        warn!("  Products refused: {}", summary.products_failed);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SEED: &str = r#"
categories:
  - name: Chips
    sort_order: 1
    products:
      - name: Sea Salt Chips
        price: "3.50"
        stock: 40
      - name: Chili Chips
        price: 3.8
        on_sale: false
  - name: Candy
"#;

    #[test]
    fn test_parse_fills_defaults() {
        let seed = parse(SEED).unwrap();
        assert_eq!(seed.categories.len(), 2);
        let chips = &seed.categories[0];
        assert_eq!(chips.products.len(), 2);
        assert!(chips.products[0].on_sale);
        assert!(!chips.products[1].on_sale);
        assert_eq!(chips.products[0].price, Decimal::new(350, 2));
        assert!(seed.categories[1].products.is_empty());
        assert!(validate_file(&seed).is_empty());
    }

    #[test]
    fn test_validation_names_bad_entries() {
        let seed = parse(
            r#"
categories:
  - name: " "
    products:
      - name: Free Lunch
        price: "0"
"#,
        )
        .unwrap();
        let problems = validate_file(&seed);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("category"));
        assert!(problems[1].contains("Price must be greater than zero"));
    }

    #[test]
    fn test_category_match_ignores_case() {
        let existing: Vec<Category> =
            serde_json::from_value(serde_json::json!([{"id": 5, "name": "Chips"}])).unwrap();
        assert!(find_category(&existing, " chips").is_some());
        assert!(find_category(&existing, "Candy").is_none());
    }

    #[test]
    fn test_product_input_carries_category() {
        let seed = parse(SEED).unwrap();
        let category: Category =
            serde_json::from_value(serde_json::json!({"id": 5, "name": "Chips"})).unwrap();
        let input = seed.categories[0].products[1].to_input(Some(&category));
        assert_eq!(input.category_id, Some(category.id));
        assert_eq!(input.status, ProductStatus::OffSale);
    }
}
