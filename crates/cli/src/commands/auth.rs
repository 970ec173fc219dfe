//! `auth` command group.

use cartwheel_client::auth::AuthSessionStore;

/// Print the current session, if any.
pub fn status(store: &AuthSessionStore) {
    match store.user() {
        Some(user) => {
            println!("signed in as {} <{}>", user.username, user.email);
        }
        None => println!("signed out"),
    }
}

/// Sign out and clear the local session.
pub async fn logout(store: &AuthSessionStore) {
    store.logout().await;
    println!("signed out");
}
