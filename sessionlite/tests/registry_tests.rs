//! Integration tests for the process-wide session handle registry

use serial_test::serial;
use sessionlite::session::{clear_handles, handle, register_handle, release_handle};
use sessionlite::storage::{DynStorageDriver, MemoryStorageDriver};
use sessionlite::{SessionConfig, SessionError, SessionManager};
use std::sync::Arc;

fn manager(name: &str) -> Arc<SessionManager> {
    let driver: DynStorageDriver = Box::new(MemoryStorageDriver::new());
    let config = SessionConfig::new().with_name(name);
    Arc::new(SessionManager::new(Arc::new(driver), config).unwrap())
}

#[test]
#[serial]
fn test_register_and_lookup() {
    clear_handles();
    register_handle("web", manager("web_sid")).unwrap();

    let found = handle("web").expect("handle should be registered");
    assert_eq!(found.config().name, "web_sid");
    assert!(handle("api").is_none());
    clear_handles();
}

#[test]
#[serial]
fn test_duplicate_registration_fails_loudly() {
    clear_handles();
    register_handle("web", manager("first")).unwrap();

    let err = register_handle("web", manager("second")).unwrap_err();
    assert!(matches!(err, SessionError::DuplicateGlobalHandle(ref name) if name == "web"));
    assert_eq!(err.code(), "SESSION_DUPLICATE_GLOBAL_HANDLE");

    // Original handle untouched
    assert_eq!(handle("web").unwrap().config().name, "first");
    clear_handles();
}

#[test]
#[serial]
fn test_release_frees_the_name() {
    clear_handles();
    register_handle("web", manager("first")).unwrap();

    let released = release_handle("web").expect("handle should be released");
    assert_eq!(released.config().name, "first");
    assert!(handle("web").is_none());

    register_handle("web", manager("second")).unwrap();
    assert_eq!(handle("web").unwrap().config().name, "second");
    clear_handles();
}

#[test]
#[serial]
fn test_handles_are_shared_across_threads() {
    clear_handles();
    register_handle("shared", manager("shared_sid")).unwrap();

    let name = std::thread::spawn(|| handle("shared").map(|m| m.config().name.clone()))
        .join()
        .unwrap();
    assert_eq!(name.as_deref(), Some("shared_sid"));
    clear_handles();
}
