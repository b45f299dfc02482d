// ============================================================================
// Structure : Catalog
// ============================================================================
// Catalogue statique des paires (catégorie, item) proposées à l'utilisateur
//
// CONCEPTS RUST :
// 1. &'static str : les libellés du catalogue de référence vivent dans le binaire
// 2. Iterator::position : retrouver l'index d'un item pour le faire cycler
// 3. Le premier item de chaque catégorie est son item par défaut
// ============================================================================

use serde::{Deserialize, Serialize};

/// Un item (modèle) proposé dans une catégorie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Identifiant envoyé au service (ex: "dunk-low")
    pub id: String,

    /// Libellé affiché (ex: "Dunk Low")
    pub label: String,
}

/// Une catégorie (marque) et ses items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    /// Identifiant envoyé au service (ex: "nike")
    pub id: String,

    /// Libellé affiché (ex: "Nike")
    pub label: String,

    /// Items offerts, le premier est l'item par défaut
    pub items: Vec<CatalogItem>,
}

impl CatalogCategory {
    pub fn new(id: &str, label: &str, items: &[(&str, &str)]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            items: items
                .iter()
                .map(|&(id, label)| CatalogItem {
                    id: id.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    /// Item par défaut de la catégorie
    pub fn default_item(&self) -> Option<&CatalogItem> {
        self.items.first()
    }

    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.item(item_id).is_some()
    }
}

/// Catalogue complet : la première catégorie est la catégorie par défaut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<CatalogCategory>) -> Self {
        Self { categories }
    }

    /// Catalogue de référence : deux marques, plusieurs modèles chacune
    pub fn reference() -> Self {
        Self::new(vec![
            CatalogCategory::new(
                "nike",
                "Nike",
                &[
                    ("dunk-low", "Dunk Low"),
                    ("air-jordan-1", "Air Jordan 1"),
                    ("air-force-1", "Air Force 1"),
                ],
            ),
            CatalogCategory::new(
                "adidas",
                "Adidas",
                &[("yeezy-350", "Yeezy Boost 350"), ("superstar", "Superstar")],
            ),
        ])
    }

    pub fn category(&self, id: &str) -> Option<&CatalogCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Catégorie par défaut (la première)
    pub fn default_category(&self) -> Option<&CatalogCategory> {
        self.categories.first()
    }

    /// Vérifie qu'une paire (catégorie, item) est valide
    pub fn is_valid(&self, category: &str, item: &str) -> bool {
        self.category(category)
            .map(|c| c.contains(item))
            .unwrap_or(false)
    }

    /// Catégorie suivante (ou précédente si step < 0), avec bouclage
    pub fn neighbour_category(&self, current: &str, step: isize) -> Option<&CatalogCategory> {
        let index = self.categories.iter().position(|c| c.id == current)?;
        let len = self.categories.len() as isize;
        let next = (index as isize + step).rem_euclid(len) as usize;
        self.categories.get(next)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::reference()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
