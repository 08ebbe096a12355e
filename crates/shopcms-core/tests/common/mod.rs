use chrono::{DateTime, Utc};
use serde_json::Value;
use shopcms_core::{
    build_default_validator, Page, PageRepository, Result, SettingsRepository, ShopSettings,
    TreeValidator,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Validator over the built-in kinds
#[allow(dead_code)]
pub fn validator() -> TreeValidator {
    build_default_validator().unwrap()
}

#[allow(dead_code)]
pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// Settings map from a JSON object literal
#[allow(dead_code)]
pub fn settings(value: Value) -> ShopSettings {
    value.as_object().cloned().unwrap()
}

/// In-memory settings store keyed by shop id
#[derive(Default)]
#[allow(dead_code)]
pub struct MemorySettings {
    pub settings: Mutex<HashMap<String, ShopSettings>>,
    pub lines: Mutex<HashMap<String, Vec<String>>>,
}

#[allow(dead_code)]
impl MemorySettings {
    pub fn with_lines(shop_id: &str, lines: &[&str]) -> Self {
        let repo = Self::default();
        repo.lines.lock().unwrap().insert(
            shop_id.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
        repo
    }

    pub fn line_count(&self, shop_id: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .get(shop_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl SettingsRepository for MemorySettings {
    fn load_settings(&self, shop_id: &str) -> Result<ShopSettings> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(shop_id)
            .cloned()
            .unwrap_or_default())
    }

    fn write_settings_atomic(&self, shop_id: &str, settings: &ShopSettings) -> Result<()> {
        self.settings
            .lock()
            .unwrap()
            .insert(shop_id.to_string(), settings.clone());
        Ok(())
    }

    fn load_audit_lines(&self, shop_id: &str) -> Result<Vec<String>> {
        Ok(self
            .lines
            .lock()
            .unwrap()
            .get(shop_id)
            .cloned()
            .unwrap_or_default())
    }

    fn append_audit_line(&self, shop_id: &str, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap()
            .entry(shop_id.to_string())
            .or_default()
            .push(line.to_string());
        Ok(())
    }
}

/// In-memory page store keyed by shop id
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryPages {
    pub pages: Mutex<HashMap<String, Vec<Page>>>,
}

impl PageRepository for MemoryPages {
    fn load_pages(&self, shop_id: &str) -> Result<Vec<Page>> {
        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(shop_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_page(&self, shop_id: &str, page: &Page) -> Result<()> {
        let mut pages = self.pages.lock().unwrap();
        let list = pages.entry(shop_id.to_string()).or_default();
        match list.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page.clone(),
            None => list.push(page.clone()),
        }
        Ok(())
    }

    fn delete_page(&self, shop_id: &str, page_id: &str) -> Result<bool> {
        let mut pages = self.pages.lock().unwrap();
        let Some(list) = pages.get_mut(shop_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|p| p.id != page_id);
        Ok(list.len() < before)
    }
}
