//! Addon manifest advertised to clients.

use serde::Serialize;

pub const ADDON_ID: &str = "community.yts";
pub const CATALOG_ID: &str = "yts";
pub const CONTENT_TYPE: &str = "movie";

/// Genres the provider can filter the catalog by.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film Noir",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Short Film",
    "Sport",
    "Superhero",
    "Thriller",
    "War",
    "Western",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub logo: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub id_prefixes: Vec<&'static str>,
    pub catalogs: Vec<CatalogDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub extra: Vec<ExtraDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDescriptor {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
    pub is_required: bool,
}

pub fn manifest() -> Manifest {
    Manifest {
        id: ADDON_ID,
        version: env!("CARGO_PKG_VERSION"),
        name: "YTS",
        description: "Movies and torrent results from YTS, with optional Real-Debrid links",
        logo: "https://i2.wp.com/fosslovers.com/wp-content/uploads/2019/01/YTS-logo.png",
        resources: vec!["catalog", "stream"],
        types: vec![CONTENT_TYPE],
        id_prefixes: vec!["tt"],
        catalogs: vec![CatalogDescriptor {
            kind: CONTENT_TYPE,
            id: CATALOG_ID,
            name: "YTS",
            extra: vec![
                ExtraDescriptor {
                    name: "genre",
                    options: GENRES.to_vec(),
                    is_required: false,
                },
                ExtraDescriptor {
                    name: "skip",
                    options: Vec::new(),
                    is_required: false,
                },
            ],
        }],
    }
}
