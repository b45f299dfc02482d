// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : KeyCode -> Action du contrôleur
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (laisse la boucle traiter les résultats de fetch)
    Tick,
}

/// Actions utilisateur, traduites en appels au contrôleur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    NextItem,
    PreviousItem,
    NextCategory,
    PreviousCategory,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

/// Traduit un événement en action (None si la touche n'est pas mappée)
///
/// Touches :
/// - q / Esc : quitter
/// - r : rafraîchir
/// - → / l, ← / h : modèle suivant / précédent
/// - Tab / b, Shift+Tab : marque suivante / précédente
pub fn action_for(event: &Event) -> Option<Action> {
    let Event::Key(key) = event else {
        return None;
    };

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Refresh),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::NextItem),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousItem),
        KeyCode::Tab | KeyCode::Char('b') => Some(Action::NextCategory),
        KeyCode::BackTab | KeyCode::Char('B') => Some(Action::PreviousCategory),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(action_for(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(&key(KeyCode::Char('r'))), Some(Action::Refresh));
        assert_eq!(action_for(&key(KeyCode::Right)), Some(Action::NextItem));
        assert_eq!(action_for(&key(KeyCode::Char('h'))), Some(Action::PreviousItem));
        assert_eq!(action_for(&key(KeyCode::Tab)), Some(Action::NextCategory));
        assert_eq!(action_for(&key(KeyCode::BackTab)), Some(Action::PreviousCategory));
    }

    #[test]
    fn test_unmapped_keys_and_ticks() {
        assert_eq!(action_for(&key(KeyCode::Char('x'))), None);
        assert_eq!(action_for(&Event::Tick), None);
    }
}
