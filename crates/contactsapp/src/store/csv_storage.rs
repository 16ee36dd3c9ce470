use super::backend::StorageBackend;
use crate::codec;
use crate::error::Result;
use crate::model::Contact;
use tracing::debug;

/// Record-typed persistence over a raw [`StorageBackend`].
///
/// This is where text becomes contacts and back; the backend only ever sees
/// encoded CSV.
pub struct CsvStorage<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> CsvStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load and decode. `Ok(None)` means nothing was ever saved under `name`.
    /// Decoding errors are returned unchanged.
    pub async fn load(&self, name: &str) -> Result<Option<Vec<Contact>>> {
        let Some(text) = self.backend.get(name).await? else {
            debug!(name, "no persisted contacts");
            return Ok(None);
        };
        let contacts = codec::decode(&text)?;
        debug!(name, count = contacts.len(), "decoded contacts");
        Ok(Some(contacts))
    }

    pub async fn save(&self, name: &str, records: &[Contact]) -> Result<()> {
        let text = codec::encode(records);
        self.backend.set(name, &text).await
    }

    pub async fn drop_entry(&self, name: &str) -> Result<()> {
        self.backend.remove(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContactsError;
    use crate::store::mem_backend::MemBackend;

    fn sample() -> Vec<Contact> {
        vec![
            Contact::new("Ada", "Lovelace", "ada@example.com", "09123456789", None),
            Contact::new(
                "Grace",
                "Hopper",
                "grace@example.com",
                "09987654321",
                Some("https://example.com/grace.png".to_string()),
            ),
        ]
    }

    #[tokio::test]
    async fn test_load_absent_passes_through() {
        let storage = CsvStorage::new(MemBackend::new());
        assert!(storage.load("contacts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = CsvStorage::new(MemBackend::new());
        let records = sample();
        storage.save("contacts", &records).await.unwrap();
        assert_eq!(storage.load("contacts").await.unwrap(), Some(records));
    }

    #[tokio::test]
    async fn test_resave_is_byte_identical() {
        let storage = CsvStorage::new(MemBackend::new());
        let records = sample();

        storage.save("contacts", &records).await.unwrap();
        let first = storage.backend().raw("contacts").unwrap();
        storage.save("contacts", &records).await.unwrap();
        let second = storage.backend().raw("contacts").unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.backend().write_count(), 2);
    }

    #[tokio::test]
    async fn test_load_propagates_decode_error() {
        let backend = MemBackend::new();
        backend.insert_raw("contacts", "id,firstName,lastName,email,phone\nbroken");
        let storage = CsvStorage::new(backend);
        assert!(matches!(
            storage.load("contacts").await,
            Err(ContactsError::MalformedRecord { row: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_drop_entry() {
        let storage = CsvStorage::new(MemBackend::new());
        storage.save("contacts", &sample()).await.unwrap();
        storage.drop_entry("contacts").await.unwrap();
        assert!(storage.load("contacts").await.unwrap().is_none());
        storage.drop_entry("contacts").await.unwrap();
    }

    #[tokio::test]
    async fn test_names_are_independent() {
        let storage = CsvStorage::new(MemBackend::new());
        storage.save("work", &sample()).await.unwrap();
        storage.save("family", &[]).await.unwrap();
        assert_eq!(storage.load("work").await.unwrap().unwrap().len(), 2);
        assert!(storage.load("family").await.unwrap().unwrap().is_empty());
    }
}
