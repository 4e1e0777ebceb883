use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Categories the demo menu uses. Stored items may carry any category string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCategory {
    Classic,
    Specials,
    Sides,
    Drinks,
    Desserts,
}

impl MenuCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Specials => "specials",
            Self::Sides => "sides",
            Self::Drinks => "drinks",
            Self::Desserts => "desserts",
        }
    }
}

/// Used for both `menu_items` and `chefs_choice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub img: String,
    pub desc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Special {
    pub name: String,
    pub price: f64,
    pub desc: String,
    pub img: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewType {
    Customer,
    Blogger,
}

impl ReviewType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Blogger => "blogger",
        }
    }
}

fn default_review_type() -> String {
    ReviewType::Customer.as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub rating: i64, // 1..=5 for the demo set; not enforced on read
    pub text: String,
    pub avatar: String,
    #[serde(rename = "type", default = "default_review_type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: i64,
    pub title: String,
    pub text: String,
    pub img: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assets {
    pub menu_pdf_url: String,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}
