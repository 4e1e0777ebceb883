//! Demo content written into empty collections at startup.
//!
//! Seeding only ever fills collections that are empty, so it is safe to run on every
//! boot. The store-wide seed lock serializes instances that share a database.

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::content::dto::{
    Assets, MenuCategory, MenuItem, Review, ReviewType, Special, TimelineEvent, Video,
};
use crate::store::{Collection, Document, DocumentStore};

const HERO_CHEF: &str = "https://images.unsplash.com/photo-1572552635104-daf938e0aa1f";
const HERO_FIRE: &str = "https://images.unsplash.com/photo-1622880833523-7cf1c0bd4296";
const PIZZA_CLOSE_1: &str = "https://images.unsplash.com/photo-1574071318508-1cdbab80d002";
const PIZZA_CLOSE_2: &str = "https://images.unsplash.com/photo-1598023696416-0193a0bcd302";
const GARLIC_BREAD: &str = "https://images.unsplash.com/photo-1573140401552-3fab0b24306f";
const TIRAMISU: &str = "https://images.unsplash.com/photo-1571877227200-a0d98ea607e9";

/// Secondary indexes for future filtered reads.
const INDEXES: &[(Collection, &str)] = &[
    (Collection::MenuItems, "category"),
    (Collection::Reviews, "type"),
];

/// The fixed demo dataset, one entry per seeded collection.
pub struct SeedData {
    pub menu_items: Vec<MenuItem>,
    pub chefs_choice: Vec<MenuItem>,
    pub reviews: Vec<Review>,
    pub timeline: Vec<TimelineEvent>,
    pub special: Special,
    pub video: Video,
    pub assets: Assets,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub seeded: Vec<Collection>,
}

fn menu_item(name: &str, price: f64, category: MenuCategory, img: &str, desc: &str) -> MenuItem {
    MenuItem {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        price,
        category: category.as_str().into(),
        img: img.into(),
        desc: desc.into(),
    }
}

fn review(name: &str, rating: i64, text: &str, avatar: u8, kind: ReviewType) -> Review {
    Review {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        rating,
        text: text.into(),
        avatar: format!("https://i.pravatar.cc/100?img={avatar}"),
        kind: kind.as_str().into(),
    }
}

fn event(year: i64, title: &str, text: &str, img: &str) -> TimelineEvent {
    TimelineEvent {
        year,
        title: title.into(),
        text: text.into(),
        img: img.into(),
    }
}

impl SeedData {
    /// Fresh ids are minted on every call.
    pub fn demo() -> Self {
        use MenuCategory::*;
        use ReviewType::*;

        let menu_items = vec![
            menu_item(
                "Margherita",
                299.0,
                Classic,
                PIZZA_CLOSE_1,
                "San Marzano tomatoes, fior di latte, basil.",
            ),
            menu_item(
                "Farmhouse",
                349.0,
                Classic,
                PIZZA_CLOSE_2,
                "Onions, capsicum, mushrooms, sweet corn.",
            ),
            menu_item(
                "Pepperoni",
                399.0,
                Classic,
                PIZZA_CLOSE_2,
                "Spicy pepperoni, mozzarella, oregano.",
            ),
            menu_item(
                "Truffle Funghi",
                499.0,
                Specials,
                PIZZA_CLOSE_1,
                "Wild mushrooms, truffle oil, parmesan.",
            ),
            menu_item(
                "Bombay Heat",
                459.0,
                Specials,
                PIZZA_CLOSE_2,
                "Tandoori chicken, jalapeño, chilli oil.",
            ),
            menu_item(
                "Garlic Bread Basket",
                159.0,
                Sides,
                GARLIC_BREAD,
                "Buttery, herby, perfectly toasted.",
            ),
            menu_item("Cheesy Dip", 79.0, Sides, PIZZA_CLOSE_1, "Silky, indulgent cheese dip."),
            menu_item("Homemade Lemonade", 99.0, Drinks, PIZZA_CLOSE_1, "Fresh, zesty and cool."),
            menu_item("Iced Tea (Peach)", 129.0, Drinks, PIZZA_CLOSE_2, "Lightly sweet, aromatic."),
            menu_item(
                "Classic Tiramisu",
                249.0,
                Desserts,
                TIRAMISU,
                "Cocoa, mascarpone, espresso.",
            ),
        ];

        let chefs_choice = vec![
            menu_item(
                "Truffle Funghi",
                499.0,
                Specials,
                PIZZA_CLOSE_1,
                "Wild mushrooms, truffle oil, parmesan.",
            ),
            menu_item(
                "Bombay Heat",
                459.0,
                Specials,
                PIZZA_CLOSE_2,
                "Tandoori chicken, jalapeño, chilli oil.",
            ),
            menu_item(
                "Burrata Margherita",
                529.0,
                Specials,
                PIZZA_CLOSE_1,
                "Creamy burrata, basil oil, San Marzano base.",
            ),
        ];

        let reviews = vec![
            review(
                "Ananya M.",
                5,
                "Best wood-fired crust in Mumbai. The truffle funghi blew my mind!",
                12,
                Customer,
            ),
            review(
                "Rahul S.",
                5,
                "Super fresh ingredients and warm service. Totally recommend!",
                5,
                Customer,
            ),
            review("Sana K.", 4, "Margherita is perfection. Simple and so flavorful.", 8, Customer),
            review(
                "Karan P.",
                5,
                "Ordered for a party, everyone loved the Bombay Heat!",
                18,
                Customer,
            ),
            review(
                "FoodieMumbai",
                5,
                concat!(
                    "Rony’s wood-fired pies are the city’s hidden gem: ",
                    "charred just right, toppings that sing."
                ),
                30,
                Blogger,
            ),
            review(
                "SliceOfLife Blog",
                5,
                "Truffle Funghi is a masterpiece. Balanced, aromatic, unforgettable.",
                16,
                Blogger,
            ),
        ];

        let timeline = vec![
            event(
                2015,
                "First Oven",
                "Started with a tiny backyard oven and neighborhood tastings.",
                HERO_CHEF,
            ),
            event(
                2018,
                "Pop-up Nights",
                "Weekend pop-ups grew a loyal base; perfected slow-fermented dough.",
                PIZZA_CLOSE_2,
            ),
            event(
                2021,
                "Rony’s Pizza Hub",
                "Opened our cozy hub in Andheri West with a wood-fired oven.",
                HERO_FIRE,
            ),
            event(
                2024,
                "30+ Varieties",
                "Seasonal specials, collabs, and chef’s tasting menus.",
                PIZZA_CLOSE_1,
            ),
            event(2025, "Community Favorite", "1000+ happy customers and counting.", GARLIC_BREAD),
        ];

        Self {
            menu_items,
            chefs_choice,
            reviews,
            timeline,
            special: Special {
                name: "Wood-Fired Burrata Margherita".into(),
                price: 529.0,
                desc: "Silky burrata on blistered San Marzano base, basil oil drizzle.".into(),
                img: PIZZA_CLOSE_1.into(),
            },
            video: Video {
                url: "https://www.youtube.com/embed/3AAdKl1UYZs".into(),
                caption: Some("From dough to fire: a peek into our wood-fired ritual.".into()),
            },
            assets: Assets {
                menu_pdf_url:
                    "https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf"
                        .into(),
            },
        }
    }
}

fn to_docs<T: Serialize>(items: &[T]) -> anyhow::Result<Vec<Document>> {
    items
        .iter()
        .map(|i| serde_json::to_value(i).context("encode seed document"))
        .collect()
}

/// Seeds every empty collection under the store's seed lock, then ensures indexes.
/// Any failure aborts startup; collections seeded before the failure stay seeded.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> anyhow::Result<SeedReport> {
    let lock = store.acquire_seed_lock().await?;
    let result = seed_locked(store, SeedData::demo()).await;

    match (result, lock.release().await) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(e)) => Err(e.context("release seed lock")),
        (Err(e), release) => {
            if let Err(re) = release {
                warn!(error = %re, "failed to release seed lock after seeding error");
            }
            Err(e)
        }
    }
}

async fn seed_locked(store: &dyn DocumentStore, data: SeedData) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    let batches = [
        (Collection::MenuItems, to_docs(&data.menu_items)?),
        (Collection::ChefsChoice, to_docs(&data.chefs_choice)?),
        (Collection::Reviews, to_docs(&data.reviews)?),
        (Collection::Specials, to_docs(std::slice::from_ref(&data.special))?),
        (Collection::Video, to_docs(std::slice::from_ref(&data.video))?),
        (Collection::Assets, to_docs(std::slice::from_ref(&data.assets))?),
        (Collection::Timeline, to_docs(&data.timeline)?),
    ];

    for (collection, docs) in batches {
        let empty = if collection.is_singleton() {
            store.find_one(collection).await?.is_none()
        } else {
            store.count(collection).await? == 0
        };
        if !empty {
            debug!(%collection, "already populated; skipping");
            continue;
        }

        let n = docs.len();
        store
            .insert_many(collection, docs)
            .await
            .with_context(|| format!("seed {collection}"))?;
        info!(%collection, documents = n, "seeded");
        report.seeded.push(collection);
    }

    for (collection, field) in INDEXES {
        store.ensure_index(*collection, field).await?;
    }

    Ok(report)
}
