// ============================================================================
// Structure : SelectionState
// ============================================================================
// Tient la paire (catégorie, item) actuellement sélectionnée
//
// CONCEPTS RUST :
// 1. Arc<Catalog> : le catalogue est partagé, jamais modifié
// 2. Result<bool, _> : Ok(true) = la sélection a changé (notification)
// 3. Invariant : l'item appartient toujours à la catégorie courante
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::models::Catalog;

/// Paire (catégorie, item) identifiant les données à afficher
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Marque (ex: "nike")
    pub category: String,

    /// Modèle (ex: "dunk-low")
    pub item: String,
}

impl Selection {
    pub fn new(category: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.item)
    }
}

/// État de sélection validé contre le catalogue
#[derive(Debug, Clone)]
pub struct SelectionState {
    catalog: Arc<Catalog>,
    current: Selection,
}

impl SelectionState {
    /// Crée l'état avec la sélection par défaut du catalogue
    ///
    /// Retourne None si le catalogue n'a aucune catégorie ou aucun item.
    pub fn new(catalog: Arc<Catalog>) -> Option<Self> {
        let category = catalog.default_category()?;
        let item = category.default_item()?;
        let current = Selection::new(category.id.clone(), item.id.clone());
        Some(Self { catalog, current })
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Change la catégorie et remet l'item sur le défaut de cette catégorie
    pub fn set_category(&mut self, category: &str) -> Result<bool, SelectionError> {
        let entry = self
            .catalog
            .category(category)
            .ok_or_else(|| SelectionError::unknown_category(category))?;
        let item = entry
            .default_item()
            .ok_or_else(|| SelectionError::unknown_category(category))?;

        let next = Selection::new(entry.id.clone(), item.id.clone());
        Ok(self.replace(next))
    }

    /// Change l'item ; il doit appartenir à la catégorie courante
    pub fn set_item(&mut self, item: &str) -> Result<bool, SelectionError> {
        if !self.catalog.is_valid(&self.current.category, item) {
            return Err(SelectionError::unknown_item(self.current.category.as_str(), item));
        }

        let next = Selection::new(self.current.category.clone(), item);
        Ok(self.replace(next))
    }

    /// Remplace la sélection entière (catégorie + item), validée
    pub fn set(&mut self, selection: Selection) -> Result<bool, SelectionError> {
        if self.catalog.category(&selection.category).is_none() {
            return Err(SelectionError::unknown_category(selection.category));
        }
        if !self.catalog.is_valid(&selection.category, &selection.item) {
            return Err(SelectionError::unknown_item(selection.category, selection.item));
        }
        Ok(self.replace(selection))
    }

    /// Passe à l'item suivant (step = 1) ou précédent (step = -1) de la catégorie
    ///
    /// CONCEPT RUST : rem_euclid
    /// - Modulo toujours positif, même pour un index négatif
    pub fn cycle_item(&mut self, step: isize) -> Result<bool, SelectionError> {
        let category = self
            .catalog
            .category(&self.current.category)
            .ok_or_else(|| SelectionError::unknown_category(self.current.category.as_str()))?;

        let index = category
            .items
            .iter()
            .position(|i| i.id == self.current.item)
            .unwrap_or(0);
        let len = category.items.len() as isize;
        let next = (index as isize + step).rem_euclid(len.max(1)) as usize;

        match category.items.get(next) {
            Some(item) => {
                let id = item.id.clone();
                self.set_item(&id)
            }
            None => Ok(false),
        }
    }

    /// Passe à la catégorie suivante/précédente (item remis au défaut)
    pub fn cycle_category(&mut self, step: isize) -> Result<bool, SelectionError> {
        let id = self
            .catalog
            .neighbour_category(&self.current.category, step)
            .map(|c| c.id.clone())
            .ok_or_else(|| SelectionError::unknown_category(self.current.category.as_str()))?;
        self.set_category(&id)
    }

    fn replace(&mut self, next: Selection) -> bool {
        if self.current == next {
            return false;
        }
        self.current = next;
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
