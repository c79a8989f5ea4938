use crate::domain::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// listing (shop-api get-content → bikes.data[])
//  ├── id                    number | string
//  ├── price                 number
//  ├── slug                  string
//  ├── image_side
//  │    └── file_url
//  ├── bike_price_log_shop   (optional)
//  │    ├── old_price
//  │    └── new_price
//  └── name, year, msrp, city, mileage_code, info, ...   (passed through)

/// One bicycle listing as returned by the shop API.
///
/// Only the fields the tracker reasons about are typed; everything else is
/// kept verbatim in `fields` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(deserialize_with = "lenient::deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::deserialize_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_string")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A price change the vendor detected itself between our fetches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLog {
    pub old_price: f64,
    pub new_price: f64,
}

impl Listing {
    /// Decodes a single raw snapshot entry. Only a missing or unusable `id`
    /// rejects the entry; other absent fields become `None`.
    pub fn from_value(value: Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected an object, got {value}"));
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }

    pub fn image_url(&self) -> Option<String> {
        self.fields
            .get("image_side")?
            .get("file_url")?
            .as_str()
            .map(str::to_string)
    }

    pub fn price_log(&self) -> Option<PriceLog> {
        let log = self.fields.get("bike_price_log_shop")?;
        Some(PriceLog {
            old_price: lenient::price_from_value(log.get("old_price")?)?,
            new_price: lenient::price_from_value(log.get("new_price")?)?,
        })
    }
}

/// Filter payload posted to the shop API. Field names mirror the site's own
/// request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopFilter {
    #[serde(rename = "frame-material")]
    pub frame_material: Vec<String>,
    #[serde(rename = "frame-sizes")]
    pub frame_sizes: Vec<String>,
    pub brands: Vec<String>,
    pub families: Vec<String>,
    #[serde(rename = "sort-by")]
    pub sort_by: String,
    pub filter_url: String,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    #[serde(default)]
    pub distinct_id: String,
    #[serde(rename = "recommendationVersion", default)]
    pub recommendation_version: Option<String>,
}

impl Default for ShopFilter {
    fn default() -> Self {
        Self {
            frame_material: vec!["carbon".into()],
            frame_sizes: vec!["m".into()],
            brands: vec!["orbea".into()],
            families: vec!["rise".into()],
            sort_by: "new".into(),
            filter_url:
                "/pl-pl/shop/brands/orbea/families/rise/frame-sizes/m/frame-material/carbon/sort-by/new"
                    .into(),
            per_page: 51,
            distinct_id: String::new(),
            recommendation_version: None,
        }
    }
}
