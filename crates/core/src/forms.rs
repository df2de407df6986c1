//! Admin form input → API payloads.
//!
//! Forms hand over raw strings exactly as typed. Parsing keeps the typed
//! name, description, category, price, and quantity verbatim (after trimming
//! surrounding whitespace) and rejects anything the API would refuse before a
//! request is ever made.

use thiserror::Error;

use crate::types::{CategoryId, NewProduct, Price, PriceError, ProductUpdate};

/// Maximum number of images attached to one product.
pub const MAX_PRODUCT_IMAGES: usize = 5;

/// Errors raised while validating form input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required field was left blank.
    #[error("{0} is required")]
    Required(&'static str),
    /// The category is not a valid id.
    #[error("category must be a numeric id, got {0:?}")]
    InvalidCategory(String),
    /// The price failed to parse.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
    /// The quantity is not a non-negative whole number.
    #[error("quantity must be a whole number of at least 0, got {0:?}")]
    InvalidQuantity(String),
    /// Too many images were attached.
    #[error("at most {max} images can be uploaded, got {count}")]
    TooManyImages {
        /// Maximum allowed.
        max: usize,
        /// Number attached.
        count: usize,
    },
    /// An attachment is not an image.
    #[error("{0} is not an image")]
    NotAnImage(String),
}

/// An image file chosen in the product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guess the MIME type from the file extension.
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "avif" => "image/avif",
            _ => "application/octet-stream",
        };
        Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// Check the attachment count and types.
///
/// # Errors
///
/// Returns [`FormError::TooManyImages`] above [`MAX_PRODUCT_IMAGES`], or
/// [`FormError::NotAnImage`] for a non-image attachment.
pub fn validate_images(images: &[ImageUpload]) -> Result<(), FormError> {
    if images.len() > MAX_PRODUCT_IMAGES {
        return Err(FormError::TooManyImages {
            max: MAX_PRODUCT_IMAGES,
            count: images.len(),
        });
    }
    if let Some(bad) = images.iter().find(|i| !i.content_type.starts_with("image/")) {
        return Err(FormError::NotAnImage(bad.file_name.clone()));
    }
    Ok(())
}

/// Raw input of the create/edit product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub price: String,
    /// Blank means "not tracked".
    pub quantity: String,
    /// Comma-separated color codes.
    pub colors: String,
    pub images: Vec<ImageUpload>,
}

/// A validated create request: the JSON-able fields plus the files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSubmission {
    pub product: NewProduct,
    pub images: Vec<ImageUpload>,
}

impl ProductForm {
    /// Validate the form for creating a product.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checking fields in form order.
    pub fn into_submission(self) -> Result<ProductSubmission, FormError> {
        let name = required(&self.name, "name")?;
        let description = required(&self.description, "description")?;
        let category_id = parse_category(required(&self.category_id, "category")?)?;
        let price = Price::parse(&self.price)?;
        let quantity = parse_quantity(&self.quantity)?;
        validate_images(&self.images)?;

        Ok(ProductSubmission {
            product: NewProduct {
                category_id,
                name: name.to_owned(),
                description: description.to_owned(),
                price,
                quantity,
                colors: parse_colors(&self.colors),
            },
            images: self.images,
        })
    }

    /// Build a partial update from an edit form; blank fields are left out.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] for a field that is filled in but invalid.
    pub fn to_update(&self) -> Result<ProductUpdate, FormError> {
        let filled = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned);
        Ok(ProductUpdate {
            category_id: filled(&self.category_id)
                .map(|raw| parse_category(&raw))
                .transpose()?,
            name: filled(&self.name),
            description: filled(&self.description),
            price: filled(&self.price)
                .map(|raw| Price::parse(&raw))
                .transpose()?,
            quantity: parse_quantity(&self.quantity)?,
            colors: filled(&self.colors).map(|raw| parse_colors(&raw)),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(value)
    }
}

fn parse_category(raw: &str) -> Result<CategoryId, FormError> {
    raw.parse()
        .map_err(|_| FormError::InvalidCategory(raw.to_owned()))
}

fn parse_quantity(raw: &str) -> Result<Option<i32>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i32>() {
        Ok(quantity) if quantity >= 0 => Ok(Some(quantity)),
        _ => Err(FormError::InvalidQuantity(raw.to_owned())),
    }
}

/// Split a comma-separated color list, keeping order and dropping blanks.
#[must_use]
pub fn parse_colors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Linen Sofa".to_string(),
            description: "Three-seater, washable covers".to_string(),
            category_id: "4".to_string(),
            price: "1499.95".to_string(),
            quantity: "7".to_string(),
            colors: "#F5F5DC, #708090,".to_string(),
            images: vec![ImageUpload::from_bytes("front.JPG", vec![1, 2, 3])],
        }
    }

    #[test]
    fn test_submission_carries_typed_values() {
        let submission = form().into_submission().unwrap();
        let product = submission.product;
        assert_eq!(product.name, "Linen Sofa");
        assert_eq!(product.description, "Three-seater, washable covers");
        assert_eq!(product.category_id, CategoryId::new(4));
        assert_eq!(product.price.amount(), Decimal::new(149_995, 2));
        assert_eq!(product.quantity, Some(7));
        assert_eq!(product.colors, vec!["#F5F5DC", "#708090"]);
        assert_eq!(submission.images[0].content_type, "image/jpeg");
    }

    #[test]
    fn test_blank_quantity_is_unknown() {
        let mut input = form();
        input.quantity = "  ".to_string();
        assert_eq!(input.into_submission().unwrap().product.quantity, None);
    }

    #[test]
    fn test_required_fields() {
        let mut input = form();
        input.name = " ".to_string();
        assert_eq!(input.into_submission(), Err(FormError::Required("name")));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut input = form();
        input.quantity = "-1".to_string();
        assert!(matches!(
            input.into_submission(),
            Err(FormError::InvalidQuantity(_))
        ));

        let mut input = form();
        input.price = "cheap".to_string();
        assert!(matches!(
            input.into_submission(),
            Err(FormError::InvalidPrice(PriceError::Invalid(_)))
        ));

        let mut input = form();
        input.category_id = "sofas".to_string();
        assert!(matches!(
            input.into_submission(),
            Err(FormError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_image_limit() {
        let mut input = form();
        input.images = (0..6)
            .map(|i| ImageUpload::from_bytes(format!("{i}.png"), vec![0]))
            .collect();
        assert_eq!(
            input.into_submission(),
            Err(FormError::TooManyImages { max: 5, count: 6 })
        );
    }

    #[test]
    fn test_non_image_rejected() {
        let images = [ImageUpload::from_bytes("specs.pdf", vec![0])];
        assert_eq!(
            validate_images(&images),
            Err(FormError::NotAnImage("specs.pdf".to_string()))
        );
    }

    #[test]
    fn test_update_only_includes_filled_fields() {
        let input = ProductForm {
            price: "99".to_string(),
            ..ProductForm::default()
        };
        let update = input.to_update().unwrap();
        assert_eq!(update.price, Some(Price::parse("99").unwrap()));
        assert!(update.name.is_none());
        assert!(update.quantity.is_none());
    }
}
