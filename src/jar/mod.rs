// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar collaborator
//!
//! A thin handle over `cookie_store`: domain/path matching, expiry and
//! storage semantics are the store's, not ours. [`CookieRecord`] is the raw
//! attribute record used to seed or persist a jar.

mod record;
mod store;

pub use record::{CookieRecord, SameSite};
pub use store::CookieJar;
