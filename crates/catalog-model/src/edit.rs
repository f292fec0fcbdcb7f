//! Edit commands applied to immutable products.
//!
//! Each command produces a new normalized [`Product`]; the product it was
//! applied to is left unchanged, so concurrent editors never share state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::media::Media;
use crate::product::{Price, Product, Seo, Weight};

/// A single change to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProductEdit {
    SetTitle {
        title: String,
    },
    SetDescription {
        description: Option<String>,
    },
    SetVendor {
        vendor: Option<String>,
    },
    SetBrand {
        brand: Option<String>,
    },
    AddTag {
        tag: String,
    },
    RemoveTag {
        tag: String,
    },
    SetSeo {
        seo: Seo,
    },
    SetVariantSku {
        variant: usize,
        sku: Option<String>,
    },
    SetVariantPrice {
        variant: usize,
        amount: Option<Decimal>,
        currency: Option<String>,
    },
    SetVariantQuantity {
        variant: usize,
        quantity: Option<i64>,
    },
    SetVariantWeight {
        variant: usize,
        weight: Option<Weight>,
    },
    RemoveVariant {
        variant: usize,
    },
    /// Reorder product media; `order` lists current 1-based positions.
    ReorderMedia {
        order: Vec<u32>,
    },
}

impl Product {
    /// Apply one edit, returning the edited copy.
    pub fn apply(&self, edit: &ProductEdit) -> Result<Product> {
        let mut next = self.clone();
        match edit {
            ProductEdit::SetTitle { title } => {
                if title.trim().is_empty() {
                    return Err(ModelError::InvalidEdit {
                        reason: "title cannot be empty".to_string(),
                    });
                }
                next.title = title.clone();
            }
            ProductEdit::SetDescription { description } => next.description = description.clone(),
            ProductEdit::SetVendor { vendor } => next.vendor = vendor.clone(),
            ProductEdit::SetBrand { brand } => next.brand = brand.clone(),
            ProductEdit::AddTag { tag } => next.tags.push(tag.clone()),
            ProductEdit::RemoveTag { tag } => next.tags.retain(|existing| existing.trim() != tag.trim()),
            ProductEdit::SetSeo { seo } => next.seo = seo.clone(),
            ProductEdit::SetVariantSku { variant, sku } => {
                variant_mut(&mut next, *variant)?.sku = sku.clone();
            }
            ProductEdit::SetVariantPrice {
                variant,
                amount,
                currency,
            } => {
                let target = variant_mut(&mut next, *variant)?;
                target.price = amount.map(|amount| Price::new(amount, currency.as_deref()));
            }
            ProductEdit::SetVariantQuantity { variant, quantity } => {
                let target = variant_mut(&mut next, *variant)?;
                target.inventory.quantity = *quantity;
                target.inventory.track_quantity = quantity.is_some();
                if let Some(quantity) = quantity {
                    target.inventory.available = Some(*quantity > 0);
                }
            }
            ProductEdit::SetVariantWeight { variant, weight } => {
                variant_mut(&mut next, *variant)?.weight = *weight;
            }
            ProductEdit::RemoveVariant { variant } => {
                if *variant >= next.variants.len() {
                    return Err(ModelError::VariantIndex {
                        index: *variant,
                        count: next.variants.len(),
                    });
                }
                if next.variants.len() == 1 {
                    return Err(ModelError::InvalidEdit {
                        reason: "cannot remove the last variant".to_string(),
                    });
                }
                next.variants.remove(*variant);
            }
            ProductEdit::ReorderMedia { order } => {
                next.media = reorder_media(&next.media, order)?;
            }
        }
        Ok(next.normalized())
    }

    /// Apply edits in sequence; the first failing edit aborts the fold.
    pub fn apply_all<'a, I>(&self, edits: I) -> Result<Product>
    where
        I: IntoIterator<Item = &'a ProductEdit>,
    {
        edits
            .into_iter()
            .try_fold(self.normalized(), |product, edit| product.apply(edit))
    }
}

fn variant_mut(product: &mut Product, index: usize) -> Result<&mut crate::product::Variant> {
    let count = product.variants.len();
    product
        .variants
        .get_mut(index)
        .ok_or(ModelError::VariantIndex { index, count })
}

fn reorder_media(media: &[Media], order: &[u32]) -> Result<Vec<Media>> {
    if order.len() != media.len() {
        return Err(ModelError::InvalidEdit {
            reason: format!(
                "media order lists {} positions for {} items",
                order.len(),
                media.len()
            ),
        });
    }
    let mut reordered = Vec::with_capacity(media.len());
    for position in order {
        let item = media
            .iter()
            .find(|item| item.position == *position)
            .ok_or_else(|| ModelError::InvalidEdit {
                reason: format!("no media at position {position}"),
            })?;
        if reordered.iter().any(|existing: &Media| existing.url == item.url) {
            return Err(ModelError::InvalidEdit {
                reason: format!("position {position} listed twice"),
            });
        }
        reordered.push(item.clone());
    }
    Ok(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::media_from_urls;
    use crate::product::Variant;

    fn product() -> Product {
        Product {
            title: "Mug".to_string(),
            media: media_from_urls(["https://m.test/a.jpg", "https://m.test/b.jpg"], None),
            variants: vec![Variant::default(), Variant::default()],
            ..Product::default()
        }
        .normalized()
    }

    #[test]
    fn edits_return_new_values() {
        let original = product();
        let edited = original
            .apply(&ProductEdit::SetTitle {
                title: "Big Mug".into(),
            })
            .unwrap();
        assert_eq!(original.title, "Mug");
        assert_eq!(edited.title, "Big Mug");
    }

    #[test]
    fn reorder_keeps_media_invariant() {
        let edited = product()
            .apply(&ProductEdit::ReorderMedia { order: vec![2, 1] })
            .unwrap();
        assert_eq!(edited.media[0].url, "https://m.test/b.jpg");
        assert!(edited.media[0].is_primary);
        assert_eq!(edited.media[1].position, 2);
        assert!(edited.check_structure().is_ok());
    }

    #[test]
    fn quantity_edit_is_clamped() {
        let edited = product()
            .apply(&ProductEdit::SetVariantQuantity {
                variant: 1,
                quantity: Some(-5),
            })
            .unwrap();
        assert_eq!(edited.variants[1].inventory.quantity, Some(0));
    }

    #[test]
    fn rejects_bad_variant_index() {
        let err = product()
            .apply(&ProductEdit::RemoveVariant { variant: 9 })
            .unwrap_err();
        assert_eq!(err, ModelError::VariantIndex { index: 9, count: 2 });
    }

    #[test]
    fn apply_all_folds_and_dedupes_tags() {
        let edits = vec![
            ProductEdit::AddTag { tag: "gift".into() },
            ProductEdit::AddTag { tag: "gift".into() },
            ProductEdit::AddTag { tag: "mug".into() },
            ProductEdit::RemoveTag { tag: "mug".into() },
        ];
        let edited = product().apply_all(&edits).unwrap();
        assert_eq!(edited.tags, vec!["gift".to_string()]);
    }

    #[test]
    fn edits_deserialize_from_json() {
        let edit: ProductEdit =
            serde_json::from_str(r#"{"op":"set_variant_sku","variant":0,"sku":"MUG-1"}"#).unwrap();
        assert_eq!(
            edit,
            ProductEdit::SetVariantSku {
                variant: 0,
                sku: Some("MUG-1".into())
            }
        );
    }
}
