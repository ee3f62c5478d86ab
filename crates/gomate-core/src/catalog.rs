// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Local catalog
//
// Hand-curated Sri Lankan routes and destinations compiled into the app.
// Used as display content for reconciled remote data and as the fallback
// whenever the remote service is unavailable. Never mutated.

use crate::types::{TransportCategory, TransportItem, TransportStatus};
use once_cell::sync::Lazy;

mod images {
    pub const BUS: &str = "https://images.unsplash.com/photo-1544620347-c4fd4a3d5957?w=400";
    pub const TRAIN: &str = "https://images.unsplash.com/photo-1474487548417-781cb71495f3?w=400";
    pub const CAR: &str = "https://images.unsplash.com/photo-1549317661-bd32c8ce0db2?w=400";
    pub const TUK_TUK: &str = "https://images.unsplash.com/photo-1589308078059-be1415eab4c3?w=400";

    pub const GALLE_FORT: &str = "https://images.unsplash.com/photo-1566552881560-0be862a7c445?w=800";
    pub const SIGIRIYA: &str = "https://images.unsplash.com/photo-1557129616-e53c61ab0332?w=800";
    pub const MIRISSA_BEACH: &str = "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=800";
    pub const COLOMBO: &str = "https://images.unsplash.com/photo-1598970434795-0c54fe7c0648?w=800";
    pub const ELLA: &str = "https://images.unsplash.com/photo-1566636889284-f8e1c5c959ea?w=800";
    pub const KANDY: &str = "https://images.unsplash.com/photo-1590070355070-ba48027ea6ce?w=800";
    pub const NUWARA_ELIYA: &str = "https://images.unsplash.com/photo-1598948485421-74c8bbcd3d06?w=800";
    pub const YALA: &str = "https://images.unsplash.com/photo-1549366021-9f761d450615?w=800";
    pub const ANURADHAPURA: &str = "https://images.unsplash.com/photo-1582407947304-fd86f028f716?w=800";
    pub const TRINCOMALEE: &str = "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=800";
}

/// Which part of a list to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFilter {
    #[default]
    All,
    Destinations,
    Routes,
}

impl CatalogFilter {
    pub fn accepts(&self, item: &TransportItem) -> bool {
        match self {
            Self::All => true,
            Self::Destinations => !item.category.is_route(),
            Self::Routes => item.category.is_route(),
        }
    }
}

/// Fields shared by every destination record
struct Destination {
    id: u64,
    title: &'static str,
    description: &'static str,
    status: TransportStatus,
    image: &'static str,
    location: &'static str,
    rating: f64,
    price: f64,
    duration: &'static str,
}

impl From<Destination> for TransportItem {
    fn from(d: Destination) -> Self {
        TransportItem {
            id: d.id,
            title: d.title.to_string(),
            description: d.description.to_string(),
            category: TransportCategory::Destination,
            status: d.status,
            image: d.image.to_string(),
            price: Some(d.price),
            location: Some(d.location.to_string()),
            rating: Some(d.rating),
            route: None,
            from: None,
            to: None,
            distance: None,
            duration: Some(d.duration.to_string()),
            departure_time: None,
            arrival_time: None,
        }
    }
}

/// Fields shared by every route record
struct Route {
    id: u64,
    title: &'static str,
    description: &'static str,
    category: TransportCategory,
    status: TransportStatus,
    image: &'static str,
    from: &'static str,
    to: &'static str,
    route: &'static str,
    /// Departure and arrival, for scheduled services only
    times: Option<(&'static str, &'static str)>,
    price: f64,
    distance: &'static str,
    duration: &'static str,
    rating: f64,
}

impl From<Route> for TransportItem {
    fn from(r: Route) -> Self {
        TransportItem {
            id: r.id,
            title: r.title.to_string(),
            description: r.description.to_string(),
            category: r.category,
            status: r.status,
            image: r.image.to_string(),
            price: Some(r.price),
            location: None,
            rating: Some(r.rating),
            route: Some(r.route.to_string()),
            from: Some(r.from.to_string()),
            to: Some(r.to.to_string()),
            distance: Some(r.distance.to_string()),
            duration: Some(r.duration.to_string()),
            departure_time: r.times.map(|(dep, _)| dep.to_string()),
            arrival_time: r.times.map(|(_, arr)| arr.to_string()),
        }
    }
}

static LOCAL_CATALOG: Lazy<Vec<TransportItem>> = Lazy::new(build_catalog);

/// The full catalog in its fixed order
pub fn all() -> &'static [TransportItem] {
    &LOCAL_CATALOG
}

/// Number of records in the catalog
pub fn len() -> usize {
    LOCAL_CATALOG.len()
}

/// Record at `index`, if in range
pub fn get(index: usize) -> Option<&'static TransportItem> {
    LOCAL_CATALOG.get(index)
}

/// Record at `index mod len()`
pub fn template_for(index: usize) -> &'static TransportItem {
    &LOCAL_CATALOG[index % LOCAL_CATALOG.len()]
}

/// Record whose id equals `id`
pub fn find_by_id(id: u64) -> Option<&'static TransportItem> {
    LOCAL_CATALOG.iter().find(|item| item.id == id)
}

/// Catalog records matching `query` as a case-insensitive substring of
/// title, description, location, route, origin or destination
pub fn search(query: &str) -> Vec<TransportItem> {
    let needle = query.to_lowercase();
    LOCAL_CATALOG
        .iter()
        .filter(|item| item.matches_lowercase(&needle))
        .cloned()
        .collect()
}

fn build_catalog() -> Vec<TransportItem> {
    use TransportStatus::*;

    vec![
        Destination {
            id: 1,
            title: "Galle Fort",
            description: "Historic Dutch fort and UNESCO World Heritage Site. Explore colonial architecture, museums, cafes, and stunning ocean views.",
            status: Popular,
            image: images::GALLE_FORT,
            location: "Galle, Southern Province",
            rating: 4.8,
            price: 0.0,
            duration: "Full Day",
        }
        .into(),
        Destination {
            id: 2,
            title: "Sigiriya Rock Fortress",
            description: "Ancient rock fortress and palace ruins, 5th century. Climb 1200 steps to see frescoes and breathtaking panoramic views.",
            status: Popular,
            image: images::SIGIRIYA,
            location: "Sigiriya, Central Province",
            rating: 4.9,
            price: 30.0,
            duration: "3-4 Hours",
        }
        .into(),
        Destination {
            id: 3,
            title: "Mirissa Beach",
            description: "Beautiful coastal town perfect for whale watching, surfing, and relaxing on golden sandy beaches.",
            status: Popular,
            image: images::MIRISSA_BEACH,
            location: "Mirissa, Southern Province",
            rating: 4.7,
            price: 0.0,
            duration: "Full Day",
        }
        .into(),
        Destination {
            id: 4,
            title: "Colombo City",
            description: "Sri Lanka's bustling capital. Visit Galle Face Green, temples, shopping districts, and experience vibrant nightlife.",
            status: Active,
            image: images::COLOMBO,
            location: "Colombo, Western Province",
            rating: 4.5,
            price: 0.0,
            duration: "Full Day",
        }
        .into(),
        Destination {
            id: 5,
            title: "Ella Town",
            description: "Picturesque hill country town. Trek to Little Adam's Peak, Nine Arch Bridge, and enjoy tea plantations.",
            status: Popular,
            image: images::ELLA,
            location: "Ella, Uva Province",
            rating: 4.8,
            price: 0.0,
            duration: "2-3 Days",
        }
        .into(),
        Destination {
            id: 6,
            title: "Temple of the Tooth - Kandy",
            description: "Sacred Buddhist temple housing the tooth relic of Buddha. UNESCO World Heritage Site with cultural shows.",
            status: Popular,
            image: images::KANDY,
            location: "Kandy, Central Province",
            rating: 4.7,
            price: 10.0,
            duration: "Half Day",
        }
        .into(),
        Route {
            id: 7,
            title: "Colombo to Galle Express",
            description: "Comfortable AC express bus service along the Southern Expressway. Scenic coastal route with modern amenities.",
            category: TransportCategory::Bus,
            status: Active,
            image: images::BUS,
            from: "Colombo Fort",
            to: "Galle Bus Stand",
            route: "Colombo → Panadura → Kalutara → Aluthgama → Hikkaduwa → Galle",
            times: Some(("06:00", "08:30")),
            price: 350.0,
            distance: "116 km",
            duration: "2.5 hours",
            rating: 4.5,
        }
        .into(),
        Route {
            id: 8,
            title: "Kandy to Ella Scenic Route",
            description: "Popular hill country route through tea estates and mountains. Regular service with panoramic views.",
            category: TransportCategory::Bus,
            status: Active,
            image: images::BUS,
            from: "Kandy Bus Terminal",
            to: "Ella Town",
            route: "Kandy → Nuwara Eliya → Haputale → Ella",
            times: Some(("07:30", "12:30")),
            price: 450.0,
            distance: "135 km",
            duration: "5 hours",
            rating: 4.3,
        }
        .into(),
        Route {
            id: 9,
            title: "Colombo to Jaffna Highway",
            description: "Long-distance luxury coach service to the Northern Province. Modern AC buses with rest stops.",
            category: TransportCategory::Bus,
            status: Active,
            image: images::BUS,
            from: "Colombo Bastian Mawatha",
            to: "Jaffna Bus Stand",
            route: "Colombo → Kurunegala → Anuradhapura → Vavuniya → Jaffna",
            times: Some(("20:00", "05:30")),
            price: 1200.0,
            distance: "396 km",
            duration: "9.5 hours",
            rating: 4.4,
        }
        .into(),
        Route {
            id: 10,
            title: "Colombo to Kandy Intercity",
            description: "Premier intercity express train through central highlands. Reserved seating with beautiful mountain scenery.",
            category: TransportCategory::Train,
            status: Active,
            image: images::TRAIN,
            from: "Colombo Fort Railway",
            to: "Kandy Railway Station",
            route: "Colombo → Rambukkana → Peradeniya → Kandy",
            times: Some(("07:00", "09:45")),
            price: 180.0,
            distance: "120 km",
            duration: "2.75 hours",
            rating: 4.6,
        }
        .into(),
        Route {
            id: 11,
            title: "Kandy to Ella - Most Scenic Train",
            description: "World-famous scenic train journey through tea country. One of the most beautiful train rides in the world!",
            category: TransportCategory::Train,
            status: Popular,
            image: images::TRAIN,
            from: "Kandy Railway Station",
            to: "Ella Railway Station",
            route: "Kandy → Hatton → Nanu Oya → Pattipola → Haputale → Ella",
            times: Some(("08:47", "15:30")),
            price: 220.0,
            distance: "135 km",
            duration: "6.75 hours",
            rating: 4.9,
        }
        .into(),
        Route {
            id: 12,
            title: "Colombo to Galle Coastal Express",
            description: "Scenic coastal railway along the Indian Ocean. Experience beach views and fishing villages.",
            category: TransportCategory::Train,
            status: Active,
            image: images::TRAIN,
            from: "Colombo Fort Railway",
            to: "Galle Railway Station",
            route: "Colombo → Mount Lavinia → Kalutara → Bentota → Hikkaduwa → Galle",
            times: Some(("06:55", "09:45")),
            price: 160.0,
            distance: "115 km",
            duration: "2.83 hours",
            rating: 4.7,
        }
        .into(),
        Route {
            id: 13,
            title: "Private Car: Colombo Airport to Galle",
            description: "Comfortable private car hire with experienced driver. Direct route via Southern Expressway.",
            category: TransportCategory::Car,
            status: Active,
            image: images::CAR,
            from: "Bandaranaike Airport",
            to: "Galle Fort",
            route: "Airport → Southern Expressway → Galle",
            times: None,
            price: 7500.0,
            distance: "150 km",
            duration: "2.5 hours",
            rating: 4.8,
        }
        .into(),
        Route {
            id: 14,
            title: "Taxi: Colombo to Sigiriya Day Trip",
            description: "Full-day hire with driver for Sigiriya and Dambulla temple visits. Comfortable AC vehicle.",
            category: TransportCategory::Car,
            status: Upcoming,
            image: images::CAR,
            from: "Colombo City",
            to: "Sigiriya Rock",
            route: "Colombo → Kurunegala → Dambulla → Sigiriya",
            times: None,
            price: 12000.0,
            distance: "169 km",
            duration: "Full Day (8 hours)",
            rating: 4.7,
        }
        .into(),
        Route {
            id: 15,
            title: "Tuk Tuk: Galle City Tour",
            description: "Explore Galle Fort and surrounding areas in an authentic Sri Lankan tuk tuk. Fun and affordable!",
            category: TransportCategory::TukTuk,
            status: Active,
            image: images::TUK_TUK,
            from: "Galle Fort Main Gate",
            to: "Galle City Tour",
            route: "Fort → Lighthouse → Dutch Church → Ramparts → Unawatuna",
            times: None,
            price: 2000.0,
            distance: "15 km",
            duration: "2 hours",
            rating: 4.6,
        }
        .into(),
        Route {
            id: 16,
            title: "Tuk Tuk: Kandy Temple Circuit",
            description: "Visit Temple of the Tooth, Botanical Gardens, and viewpoints around Kandy Lake.",
            category: TransportCategory::TukTuk,
            status: Active,
            image: images::TUK_TUK,
            from: "Kandy City Center",
            to: "Kandy Attractions",
            route: "Dalada Maligawa → Peradeniya Gardens → Bahirawakanda → Kandy Lake",
            times: None,
            price: 2500.0,
            distance: "20 km",
            duration: "3 hours",
            rating: 4.5,
        }
        .into(),
        Destination {
            id: 17,
            title: "Yala National Park",
            description: "Sri Lanka's most famous wildlife park. Safari to spot elephants, leopards, sloth bears, and exotic birds.",
            status: Popular,
            image: images::YALA,
            location: "Yala, Southern Province",
            rating: 4.8,
            price: 45.0,
            duration: "Half Day Safari",
        }
        .into(),
        Destination {
            id: 18,
            title: "Anuradhapura Ancient City",
            description: "Ancient capital and UNESCO site with Buddhist stupas, monasteries, and sacred Bodhi tree.",
            status: Active,
            image: images::ANURADHAPURA,
            location: "Anuradhapura, North Central",
            rating: 4.6,
            price: 25.0,
            duration: "Full Day",
        }
        .into(),
        Destination {
            id: 19,
            title: "Nuwara Eliya - Little England",
            description: "Cool climate hill station with tea plantations, colonial architecture, and Gregory Lake.",
            status: Popular,
            image: images::NUWARA_ELIYA,
            location: "Nuwara Eliya, Central Province",
            rating: 4.7,
            price: 0.0,
            duration: "1-2 Days",
        }
        .into(),
        Destination {
            id: 20,
            title: "Trincomalee Beaches",
            description: "Pristine beaches on the east coast. Perfect for snorkeling, diving, and whale watching.",
            status: Active,
            image: images::TRINCOMALEE,
            location: "Trincomalee, Eastern Province",
            rating: 4.6,
            price: 0.0,
            duration: "2-3 Days",
        }
        .into(),
    ]
}
