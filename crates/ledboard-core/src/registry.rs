//! Catalog of constructible apps keyed by class name.

use alloc::{boxed::Box, vec::Vec};

use log::{info, warn};

use crate::{app::App, settings::AppEntry};

type AppFactory = Box<dyn Fn() -> Box<dyn App>>;

pub struct AppDefinition {
    pub name: &'static str,
    pub class_name: &'static str,
    /// Whether a freshly added config entry starts enabled.
    pub enabled_by_default: bool,
    factory: AppFactory,
}

impl AppDefinition {
    pub fn new<F>(
        name: &'static str,
        class_name: &'static str,
        enabled_by_default: bool,
        factory: F,
    ) -> Self
    where
        F: Fn() -> Box<dyn App> + 'static,
    {
        Self {
            name,
            class_name,
            enabled_by_default,
            factory: Box::new(factory),
        }
    }

    pub fn create(&self) -> Box<dyn App> {
        (self.factory)()
    }

    fn entry(&self) -> AppEntry {
        AppEntry::new(self.name, self.class_name, self.enabled_by_default)
    }
}

#[derive(Default)]
pub struct AppCatalog {
    definitions: Vec<AppDefinition>,
}

impl AppCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any earlier one with the same class name.
    pub fn register(&mut self, definition: AppDefinition) {
        match self
            .definitions
            .iter_mut()
            .find(|existing| existing.class_name == definition.class_name)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }

    pub fn definition(&self, class_name: &str) -> Option<&AppDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.class_name == class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|definition| definition.class_name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Config entries for every registered app, in registration order.
    pub fn default_entries(&self) -> Vec<AppEntry> {
        self.definitions.iter().map(AppDefinition::entry).collect()
    }

    /// Appends entries for catalog apps missing from `entries`. Returns how
    /// many were added.
    pub fn reconcile(&self, entries: &mut Vec<AppEntry>) -> usize {
        let mut added = 0;
        for definition in &self.definitions {
            if entries
                .iter()
                .any(|entry| entry.class_name == definition.class_name)
            {
                continue;
            }
            info!("registry: adding missing app class={}", definition.class_name);
            entries.push(definition.entry());
            added += 1;
        }
        added
    }

    /// Builds every enabled entry in order. Unknown class names are skipped.
    pub fn create_enabled(&self, entries: &[AppEntry]) -> Vec<Box<dyn App>> {
        entries
            .iter()
            .filter(|entry| entry.enabled)
            .filter_map(|entry| match self.definition(&entry.class_name) {
                Some(definition) => Some(definition.create()),
                None => {
                    warn!("registry: unknown app class={}", entry.class_name);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::AppResult, display::Canvas};

    struct Named(&'static str);

    impl App for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn render(&mut self, _canvas: &mut Canvas, _now_ms: u64) -> AppResult {
            Ok(())
        }
    }

    fn catalog() -> AppCatalog {
        let mut catalog = AppCatalog::new();
        catalog.register(AppDefinition::new("Clock", "clock", true, || {
            Box::new(Named("Clock"))
        }));
        catalog.register(AppDefinition::new("Tally", "tally", false, || {
            Box::new(Named("Tally"))
        }));
        catalog
    }

    #[test]
    fn reconcile_appends_missing_apps_only() {
        let catalog = catalog();
        let mut entries = vec![AppEntry::new("My Tally", "tally", true)];

        assert_eq!(catalog.reconcile(&mut entries), 1);
        assert_eq!(
            entries,
            vec![
                AppEntry::new("My Tally", "tally", true),
                AppEntry::new("Clock", "clock", true),
            ]
        );
        assert_eq!(catalog.reconcile(&mut entries), 0);
    }

    #[test]
    fn create_enabled_skips_disabled_and_unknown() {
        let catalog = catalog();
        let entries = vec![
            AppEntry::new("Tally", "tally", true),
            AppEntry::new("Ghost", "ghost", true),
            AppEntry::new("Clock", "clock", false),
        ];

        let apps = catalog.create_enabled(&entries);
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name(), "Tally");
    }

    #[test]
    fn register_replaces_same_class() {
        let mut catalog = catalog();
        catalog.register(AppDefinition::new("Clock 2", "clock", true, || {
            Box::new(Named("Clock 2"))
        }));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.definition("clock").unwrap().create().name(), "Clock 2");
    }

    #[test]
    fn default_entries_follow_registration_order() {
        let entries = catalog().default_entries();
        let classes: Vec<_> = entries.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(classes, ["clock", "tally"]);
        assert!(!entries[1].enabled);
    }
}
