use std::cell::RefCell;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Durable, origin-scoped storage for the visitor's explicit theme choice.
/// One fixed key, string-valued.
pub trait ThemeStore {
    fn load(&self) -> anyhow::Result<Option<String>>;
    fn save(&self, value: &str) -> anyhow::Result<()>;
}

/// The host environment's ambient color-scheme preference, queried only when
/// nothing has been persisted.
pub trait ColorSchemeProbe {
    fn prefers_dark(&self) -> bool;
}

pub type ClipboardWrite<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;

/// Asynchronous clipboard-write capability. The write settling is the only
/// suspension point in the whole module.
pub trait Clipboard {
    fn write_text(&self, text: String) -> ClipboardWrite<'_>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeState {
    #[serde(default)]
    theme: Option<String>,
}

/// Theme storage backed by a JSON state file.
pub struct JsonThemeStore {
    path: PathBuf,
}

impl JsonThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ThemeStore for JsonThemeStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let state: ThemeState = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(state.theme)
    }

    fn save(&self, value: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let state = ThemeState {
            theme: Some(value.to_string()),
        };
        let bytes = serde_json::to_vec_pretty(&state).context("serialize theme state")?;
        std::fs::write(&self.path, bytes).with_context(|| format!("write {}", self.path.display()))
    }
}

/// In-memory theme storage: a first visit with nothing persisted, or a test
/// double seeded with a prior choice.
#[derive(Default)]
pub struct MemoryThemeStore {
    value: RefCell<Option<String>>,
}

impl MemoryThemeStore {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: RefCell::new(value.map(str::to_string)),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, value: &str) -> anyhow::Result<()> {
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

/// Ambient preference fixed for the lifetime of a run.
pub struct FixedScheme {
    dark: bool,
}

impl FixedScheme {
    pub fn dark() -> Self {
        Self { dark: true }
    }

    pub fn light() -> Self {
        Self { dark: false }
    }
}

impl ColorSchemeProbe for FixedScheme {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// System clipboard via arboard. The handle is opened per write so a missing
/// display server surfaces as an ordinary rejected write.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: String) -> ClipboardWrite<'_> {
        Box::pin(async move {
            let mut clipboard = arboard::Clipboard::new().context("open system clipboard")?;
            clipboard.set_text(text).context("write system clipboard")?;
            Ok(())
        })
    }
}

/// Scripted clipboard double: accepts or rejects every write and records the
/// text of each request.
pub struct ScriptedClipboard {
    accept: bool,
    written: RefCell<Vec<String>>,
}

impl ScriptedClipboard {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            written: RefCell::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            written: RefCell::new(Vec::new()),
        }
    }

    /// Text of every write requested so far, in request order.
    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl Clipboard for ScriptedClipboard {
    fn write_text(&self, text: String) -> ClipboardWrite<'_> {
        self.written.borrow_mut().push(text);
        let accept = self.accept;
        Box::pin(async move {
            if accept {
                Ok(())
            } else {
                anyhow::bail!("clipboard write rejected")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_store_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("state/theme.json");

        let store = JsonThemeStore::new(path.clone());
        assert_eq!(store.load().unwrap(), None);

        store.save("dark").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("dark"));

        // A second handle on the same file sees the persisted value.
        let reopened = JsonThemeStore::new(path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn json_store_rejects_garbage() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("theme.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(JsonThemeStore::new(path).load().is_err());
    }

    #[tokio::test]
    async fn scripted_clipboard_records_requests() {
        let clipboard = ScriptedClipboard::rejecting();
        assert!(clipboard.write_text("abc".to_string()).await.is_err());
        assert_eq!(clipboard.written(), vec!["abc".to_string()]);

        let clipboard = ScriptedClipboard::accepting();
        assert!(clipboard.write_text("xyz".to_string()).await.is_ok());
        assert_eq!(clipboard.written(), vec!["xyz".to_string()]);
    }
}
