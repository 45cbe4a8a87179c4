// ============================================================================
// Module : storage
// ============================================================================
// Persistance clé/valeur des lançamentos
//
// CONCEPTS RUST :
// 1. Trait KeyValueStore : interface commune (fichiers JSON, mémoire)
// 2. Generics : LedgerStore<S: KeyValueStore> fonctionne avec les deux
// 3. Temp file + rename : une sauvegarde interrompue ne corrompt pas le fichier
// ============================================================================

pub mod ledger_store;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

pub use ledger_store::{LedgerStore, LEDGER_BACKUP_KEY, LEDGER_KEY};

/// Stockage clé → texte (équivalent du localStorage du navigateur)
pub trait KeyValueStore {
    /// Lit la valeur d'une clé, None si la clé n'existe pas
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Écrit (ou remplace) la valeur d'une clé
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stockage choisi à l'exécution (fichier ou mémoire), partageable entre threads
pub type BoxedStore = Box<dyn KeyValueStore + Send>;

// CONCEPT RUST : Blanket impl
// - Une Box<S> se comporte comme le S qu'elle contient
// - Permet LedgerStore<BoxedStore> sans rendre App générique
impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

// ============================================================================
// JsonFileStore : un fichier <clé>.json par clé
// ============================================================================

/// Stockage sur disque, dans le répertoire de données
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Ouvre (et crée si besoin) le répertoire de stockage
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Échec de la création de {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Chemin du fichier d'une clé
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(path = %path.display(), "Storage key not found");
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
        Ok(Some(data))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Écrit d'abord dans un fichier temporaire, puis renomme
        fs::write(&tmp, value)
            .with_context(|| format!("Échec de l'écriture de {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Échec du renommage vers {}", path.display()))?;

        debug!(path = %path.display(), bytes = value.len(), "Storage key written");
        Ok(())
    }
}

// ============================================================================
// MemoryStore : pour les tests et le mode sans disque
// ============================================================================

/// Stockage en mémoire
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "[]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_json_file_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("lancamentos").unwrap(), None);
        store.set("lancamentos", "[1,2]").unwrap();

        let path = store.path_for("lancamentos");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.get("lancamentos").unwrap().as_deref(), Some("[1,2]"));
    }
}
