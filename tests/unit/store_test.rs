use std::sync::{Arc, Mutex};

use tabshell::state::actions::{ProfileAction, TabAction};
use tabshell::state::store::Store;
use tabshell::state::{profile_reducer, tab_reducer};
use tabshell::types::profile::ProfileState;
use tabshell::types::tab_state::TabState;

#[test]
fn test_dispatch_applies_reducer() {
    let mut store = Store::new(TabState::initial(), tab_reducer::reduce);
    store.dispatch(TabAction::CreateTab { location: None });
    assert_eq!(store.state().pages.len(), 2);
}

#[test]
fn test_subscribers_see_every_new_state() {
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    let mut store = Store::new(TabState::initial(), tab_reducer::reduce);
    store.subscribe(move |state: &TabState| {
        seen_clone.lock().unwrap().push(state.pages.len());
    });

    store.dispatch(TabAction::CreateTab { location: None });
    store.dispatch(TabAction::CreateTab { location: None });
    store.dispatch(TabAction::CloseTab { page_index: 0 });

    assert_eq!(*seen.lock().unwrap(), vec![2, 3, 2]);
}

#[test]
fn test_multiple_subscribers_all_notified() {
    let count_a = Arc::new(Mutex::new(0u32));
    let count_b = Arc::new(Mutex::new(0u32));

    let mut store = Store::new(ProfileState::default(), profile_reducer::reduce);
    {
        let count_a = count_a.clone();
        store.subscribe(move |_: &ProfileState| *count_a.lock().unwrap() += 1);
    }
    {
        let count_b = count_b.clone();
        store.subscribe(move |_: &ProfileState| *count_b.lock().unwrap() += 1);
    }
    assert_eq!(store.subscriber_count(), 2);

    store.dispatch(ProfileAction::Bookmark {
        url: "http://a.com".to_string(),
    });
    assert_eq!(*count_a.lock().unwrap(), 1);
    assert_eq!(*count_b.lock().unwrap(), 1);
}

#[test]
fn test_subscriber_sees_state_after_reduction() {
    let observed = Arc::new(Mutex::new(None));
    let observed_clone = observed.clone();

    let mut store = Store::new(ProfileState::default(), profile_reducer::reduce);
    store.subscribe(move |state: &ProfileState| {
        *observed_clone.lock().unwrap() = Some(state.bookmarks.contains("http://a.com"));
    });

    store.dispatch(ProfileAction::Bookmark {
        url: "http://a.com".to_string(),
    });
    assert_eq!(*observed.lock().unwrap(), Some(true));
}
