use tempfile::TempDir;
use trade_journal_core::errors::CoreError;
use trade_journal_core::models::draft::TradeDraft;
use trade_journal_core::models::instrument::Instrument;
use trade_journal_core::models::session::Session;
use trade_journal_core::storage::envelope::{KdfParams, MAGIC};
use trade_journal_core::storage::session_store::{
    EncryptedFileStore, MemorySessionStore, SessionStore,
};

/// Cheap Argon2 costs so the suite stays fast.
const TEST_KDF: KdfParams = KdfParams {
    memory_cost: 256,
    time_cost: 1,
    parallelism: 1,
};

fn sample_draft() -> TradeDraft {
    let mut draft = TradeDraft::default();
    draft.trade.symbol = "NQH5".into();
    draft.trade.notes = "Judas swing into London open".into();
    draft.risk.select_instrument(Instrument::Nq);
    draft.risk.account_balance = Some(50_000.0);
    draft
}

// ═══════════════════════════════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════════════════════════════

mod memory {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = MemorySessionStore::new();
        assert!(store.load_session().is_none());
        assert!(store.load_draft().is_none());
    }

    #[test]
    fn session_and_draft_are_independent() {
        let mut store = MemorySessionStore::new();
        store.save_session(Some(&Session::new("tok", "alice"))).unwrap();
        store.save_draft(Some(&sample_draft())).unwrap();

        store.clear_session().unwrap();
        assert!(store.load_session().is_none());
        assert_eq!(store.load_draft(), Some(sample_draft()));

        store.clear_draft().unwrap();
        assert!(store.load_draft().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Encrypted file store
// ═══════════════════════════════════════════════════════════════════

mod encrypted_file {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store =
            EncryptedFileStore::open_with(dir.path().join("journal.tjrn"), "pw", TEST_KDF).unwrap();
        assert!(store.load_session().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.tjrn");
        {
            let mut store = EncryptedFileStore::open_with(&path, "pw", TEST_KDF).unwrap();
            store.save_session(Some(&Session::new("tok-1", "alice"))).unwrap();
            store.save_draft(Some(&sample_draft())).unwrap();
        }

        let store = EncryptedFileStore::open(&path, "pw").unwrap();
        assert_eq!(store.load_session(), Some(Session::new("tok-1", "alice")));
        assert_eq!(store.load_draft(), Some(sample_draft()));
    }

    #[test]
    fn file_is_sealed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.tjrn");
        let mut store = EncryptedFileStore::open_with(&path, "pw", TEST_KDF).unwrap();
        store.save_session(Some(&Session::new("secret-token", "alice"))).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("secret-token"));
        assert!(!text.contains("alice"));
    }

    #[test]
    fn wrong_password() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.tjrn");
        let mut store = EncryptedFileStore::open_with(&path, "right", TEST_KDF).unwrap();
        store.save_session(Some(&Session::new("t", "u"))).unwrap();

        let err = EncryptedFileStore::open(&path, "wrong").unwrap_err();
        assert!(matches!(err, CoreError::Decryption));
    }

    #[test]
    fn not_a_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "just some text, definitely longer than a header would be").unwrap();

        let err = EncryptedFileStore::open(&path, "pw").unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }

    #[test]
    fn clearing_session_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.tjrn");
        let mut store = EncryptedFileStore::open_with(&path, "pw", TEST_KDF).unwrap();
        store.save_session(Some(&Session::new("t", "u"))).unwrap();
        store.clear_session().unwrap();

        let reopened = EncryptedFileStore::open(&path, "pw").unwrap();
        assert!(reopened.load_session().is_none());
    }
}
