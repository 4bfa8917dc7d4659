//! User profile documents and the signed-in session.
//!
//! `Session` carries the identity and cached profile explicitly; there is no
//! process-wide "current user".

use crate::{Error, IntensityLevel, Result, UserId, UserProfile};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Document store for user profiles, keyed by identity
pub trait ProfileStore {
    fn fetch(&self, user: &UserId) -> Result<UserProfile>;

    /// Replace the whole profile document
    fn save(&self, user: &UserId, profile: &UserProfile) -> Result<()>;
}

/// One JSON document per user under a directory
#[derive(Clone, Debug)]
pub struct JsonProfileStore {
    dir: PathBuf,
}

impl JsonProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn profile_path(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{}.json", user.file_stem()))
    }
}

impl ProfileStore for JsonProfileStore {
    fn fetch(&self, user: &UserId) -> Result<UserProfile> {
        let path = self.profile_path(user);
        if !path.exists() {
            return Err(Error::RemoteFailure(format!("user data not found for {}", user)));
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::RemoteFailure(format!("reading profile {:?}: {}", path, e)))?;
        let profile = serde_json::from_str::<UserProfile>(&contents)
            .map_err(|e| Error::ParseFailure(format!("profile {:?}: {}", path, e)))?;

        tracing::debug!("Loaded profile for {} from {:?}", user, path);
        Ok(profile)
    }

    fn save(&self, user: &UserId, profile: &UserProfile) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.profile_path(user);

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        let contents = serde_json::to_string_pretty(profile)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile for {} to {:?}", user, path);
        Ok(())
    }
}

/// Identity plus cached profile for one user session
#[derive(Clone, Debug, Default)]
pub struct Session {
    user: Option<UserId>,
    profile: Option<UserProfile>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: Some(user),
            profile: None,
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user);
        }
        self.profile = None;
    }

    /// The signed-in identity, or `NotAuthenticated`
    pub fn user(&self) -> Result<&UserId> {
        self.user.as_ref().ok_or(Error::NotAuthenticated)
    }

    pub fn cached_profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Cached profile, fetched on first use
    pub fn profile<P: ProfileStore + ?Sized>(&mut self, store: &P) -> Result<&UserProfile> {
        if self.profile.is_none() {
            self.refresh_profile(store)?;
        }
        self.profile
            .as_ref()
            .ok_or_else(|| Error::RemoteFailure("user data not found".into()))
    }

    /// Re-fetch the profile, replacing the cache
    pub fn refresh_profile<P: ProfileStore + ?Sized>(&mut self, store: &P) -> Result<&UserProfile> {
        let user = self.user()?.clone();
        let profile = store.fetch(&user)?;
        Ok(&*self.profile.insert(profile))
    }

    /// Store a full profile replacement and cache it
    pub fn replace_profile<P: ProfileStore + ?Sized>(
        &mut self,
        store: &P,
        profile: UserProfile,
    ) -> Result<&UserProfile> {
        let user = self.user()?.clone();
        store.save(&user, &profile)?;
        Ok(&*self.profile.insert(profile))
    }

    /// Write the blank profile a new account starts with
    pub fn sign_up<P: ProfileStore + ?Sized>(
        &mut self,
        store: &P,
        name: &str,
        email: &str,
    ) -> Result<&UserProfile> {
        let profile = UserProfile::new_signup(name, email);
        tracing::info!("Registered {}", self.user()?);
        self.replace_profile(store, profile)
    }

    /// Settings update: name, weight, target weight and intensity change;
    /// email and height carry over from the current profile.
    pub fn update_settings<P: ProfileStore + ?Sized>(
        &mut self,
        store: &P,
        name: &str,
        weight: i32,
        target_weight: i32,
        intensity: Option<IntensityLevel>,
    ) -> Result<&UserProfile> {
        let current = self.profile(store)?.clone();
        let updated = UserProfile {
            name: name.to_string(),
            email: current.email,
            height: current.height,
            weight,
            intensity_level: intensity,
            target_weight,
        };
        self.replace_profile(store, updated)
    }
}
