//! Invariant-preserving updates of the stored collections.
//!
//! Each mutation computes the complete new collection and writes it once.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::builder::OrganizationDraft;
use crate::model::*;
use crate::store::*;

/// The active election of an organization.
///
/// Falls back to the first election of the organization when none is flagged.
pub fn active_election<'a>(elections: &'a [Election], organization_id: &str) -> Option<&'a Election> {
    elections
        .iter()
        .find(|e| e.organization_id == organization_id && e.is_active)
        .or_else(|| elections.iter().find(|e| e.organization_id == organization_id))
}

/// Appends an election as the active one of its organization.
///
/// The new election gets an id greater than every stored id. Its siblings in
/// the same organization are deactivated; other organizations are untouched.
pub fn with_election_added(
    elections: &[Election],
    election: Election,
    now: DateTime<Utc>,
) -> (Vec<Election>, Election) {
    let id = next_election_id(now, elections.iter().map(|e| e.id));
    let mut res: Vec<Election> = elections
        .iter()
        .map(|e| Election {
            is_active: e.is_active && e.organization_id != election.organization_id,
            ..e.clone()
        })
        .collect();
    let added = Election {
        id,
        is_active: true,
        ..election
    };
    res.push(added.clone());
    (res, added)
}

/// Makes `id` the only active election of its organization.
///
/// Returns None when no election has this id.
pub fn with_active_election(elections: &[Election], id: ElectionId) -> Option<Vec<Election>> {
    let organization_id = elections.iter().find(|e| e.id == id)?.organization_id.clone();
    Some(
        elections
            .iter()
            .map(|e| {
                if e.organization_id == organization_id {
                    Election {
                        is_active: e.id == id,
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect(),
    )
}

/// The console context: a store plus the currently selected organization.
///
/// Lifecycle: `load` at startup, `select_organization` persists the choice,
/// `logout` clears it.
pub struct Session<S: CollectionStore> {
    store: S,
    user_id: String,
    current: Option<Organization>,
}

impl<S: CollectionStore> Session<S> {
    /// Restores the selected organization.
    ///
    /// If nothing is selected and exactly one organization exists, it gets selected.
    pub fn load(store: S, user_id: &str) -> StoreResult<Session<S>> {
        let mut session = Session {
            store,
            user_id: user_id.to_string(),
            current: None,
        };
        session.current = load_record(&session.store, StorageKey::CurrentOrganization)?;
        if session.current.is_none() {
            let organizations = session.organizations()?;
            if let [single] = organizations.as_slice() {
                info!("Session::load: selecting the only organization {}", single.id);
                session.current = Some(single.clone());
                save_record(&mut session.store, StorageKey::CurrentOrganization, single)?;
            }
        }
        Ok(session)
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> S {
        self.store
    }

    pub fn current_organization(&self) -> Option<&Organization> {
        self.current.as_ref()
    }

    pub fn organizations(&self) -> StoreResult<Vec<Organization>> {
        load_collection(&self.store, StorageKey::Organizations)
    }

    /// Creates an organization from the wizard and selects it.
    ///
    /// Returns None if the draft is incomplete.
    pub fn create_organization(
        &mut self,
        draft: &OrganizationDraft,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Organization>> {
        let mut organizations = self.organizations()?;
        let org = match draft.submit(&self.user_id, now, &organizations) {
            Some(o) => o,
            None => return Ok(None),
        };
        organizations.push(org.clone());
        save_collection(&mut self.store, StorageKey::Organizations, &organizations)?;
        info!("Session::create_organization: created {} ({})", org.id, org.name);
        self.set_current(org.clone())?;
        Ok(Some(org))
    }

    /// Selects a stored organization. Returns None if the id is unknown.
    pub fn select_organization(&mut self, id: &str) -> StoreResult<Option<Organization>> {
        let org = match self.organizations()?.into_iter().find(|o| o.id == id) {
            Some(o) => o,
            None => {
                warn!("Session::select_organization: unknown organization {}", id);
                return Ok(None);
            }
        };
        self.set_current(org.clone())?;
        Ok(Some(org))
    }

    fn set_current(&mut self, org: Organization) -> StoreResult<()> {
        save_record(&mut self.store, StorageKey::CurrentOrganization, &org)?;
        self.current = Some(org);
        Ok(())
    }

    pub fn logout(&mut self) -> StoreResult<()> {
        self.current = None;
        self.store.remove(StorageKey::CurrentOrganization)
    }

    /// Removes every stored key.
    pub fn reset(&mut self) -> StoreResult<()> {
        for key in StorageKey::ALL {
            self.store.remove(key)?;
        }
        self.current = None;
        Ok(())
    }

    pub fn all_elections(&self) -> StoreResult<Vec<Election>> {
        load_collection(&self.store, StorageKey::Elections)
    }

    /// The elections of the current organization. Empty when none is selected.
    pub fn elections(&self) -> StoreResult<Vec<Election>> {
        let org_id = match &self.current {
            Some(o) => o.id.clone(),
            None => return Ok(Vec::new()),
        };
        Ok(self
            .all_elections()?
            .into_iter()
            .filter(|e| e.organization_id == org_id)
            .collect())
    }

    pub fn election(&self, id: ElectionId) -> StoreResult<Option<Election>> {
        Ok(self.elections()?.into_iter().find(|e| e.id == id))
    }

    pub fn active_election(&self) -> StoreResult<Option<Election>> {
        let org = match &self.current {
            Some(o) => o,
            None => return Ok(None),
        };
        let elections = self.all_elections()?;
        Ok(active_election(&elections, &org.id).cloned())
    }

    /// Stores a submitted election as the active one of its organization.
    pub fn add_election(&mut self, election: Election, now: DateTime<Utc>) -> StoreResult<Election> {
        let elections = self.all_elections()?;
        let (updated, added) = with_election_added(&elections, election, now);
        save_collection(&mut self.store, StorageKey::Elections, &updated)?;
        info!("Session::add_election: added election {}", added.id);
        Ok(added)
    }

    /// Activates an election of the current organization.
    ///
    /// Returns false, without writing anything, if the id is not one of its elections.
    pub fn set_active_election(&mut self, id: ElectionId) -> StoreResult<bool> {
        if self.election(id)?.is_none() {
            warn!("Session::set_active_election: unknown election {}", id);
            return Ok(false);
        }
        let elections = self.all_elections()?;
        match with_active_election(&elections, id) {
            Some(updated) => {
                save_collection(&mut self.store, StorageKey::Elections, &updated)?;
                info!("Session::set_active_election: election {} is now active", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ElectionDraft, ElectionWizard};
    use crate::store::tests::scratch_dir;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn election(id: ElectionId, org: &str, active: bool) -> Election {
        let mut e = ElectionWizard::new(OrganizationType::Professional).submit(org);
        e.id = id;
        e.title = format!("Election {}", id);
        e.is_active = active;
        e
    }

    fn active_ids(elections: &[Election]) -> Vec<ElectionId> {
        elections.iter().filter(|e| e.is_active).map(|e| e.id).collect()
    }

    #[test]
    fn activation_is_scoped_to_the_organization() {
        let elections = vec![
            election(1, "a", true),
            election(2, "a", false),
            election(3, "b", true),
            election(4, "a", false),
        ];
        let updated = with_active_election(&elections, 2).unwrap();
        assert_eq!(active_ids(&updated), vec![2, 3]);
        assert_eq!(updated[2], elections[2]);
        assert!(with_active_election(&elections, 99).is_none());
    }

    #[test]
    fn adding_deactivates_siblings() {
        let elections = vec![election(1, "a", true), election(2, "b", true)];
        let (updated, added) = with_election_added(&elections, election(0, "a", false), at(2));
        assert_eq!(added.id, 3);
        assert!(added.is_active);
        assert_eq!(active_ids(&updated), vec![2, 3]);

        let (updated, added) = with_election_added(&elections, election(0, "c", false), at(50));
        assert_eq!(added.id, 50);
        assert_eq!(active_ids(&updated), vec![1, 2, 50]);

        let big = i64::MAX as ElectionId + 1;
        let (_, added) = with_election_added(&[election(big, "a", true)], election(0, "a", false), at(50));
        assert_eq!(added.id, big + 1);
    }

    #[test]
    fn elections_without_organization_still_load() {
        let mut store = MemoryStore::new();
        store
            .write(
                StorageKey::Elections,
                r#"[{
                    "id": 2, "title": "Municipales 2024 - Libreville", "date": "2024-10-20",
                    "status": "En cours", "statusColor": "green", "description": "",
                    "voters": 89456, "candidates": 0, "centers": 28, "bureaux": 112,
                    "location": "Libreville Centre", "type": "Locales", "seatsAvailable": 3,
                    "province": "Estuaire", "commune": "Libreville", "isActive": false
                }]"#,
            )
            .unwrap();
        let session = Session::load(store, "current-user").unwrap();
        let all = session.all_elections().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, ElectionStatus::Ongoing);
        assert_eq!(all[0].organization_id, "");
        assert!(active_election(&all, "o1").is_none());
    }

    #[test]
    fn active_election_falls_back_to_first() {
        let elections = vec![election(1, "b", true), election(2, "a", false), election(3, "a", false)];
        assert_eq!(active_election(&elections, "a").map(|e| e.id), Some(2));
        assert_eq!(active_election(&elections, "b").map(|e| e.id), Some(1));
        assert!(active_election(&elections, "z").is_none());
    }

    #[test]
    fn session_lifecycle() {
        let mut session = Session::load(MemoryStore::new(), "current-user").unwrap();
        assert!(session.current_organization().is_none());
        assert!(session.elections().unwrap().is_empty());

        let draft = OrganizationDraft {
            name: "Gabon 2024".to_string(),
            organization_type: Some(OrganizationType::Territorial),
            description: String::new(),
        };
        let org = session.create_organization(&draft, at(1_000)).unwrap().unwrap();
        assert_eq!(session.current_organization(), Some(&org));

        session.logout().unwrap();
        assert!(session.current_organization().is_none());

        // A single organization gets selected again at load time.
        let session = Session::load(session.into_store(), "current-user").unwrap();
        assert_eq!(session.current_organization(), Some(&org));
    }

    #[test]
    fn set_active_election_ignores_other_organizations() {
        let mut store = MemoryStore::new();
        let elections = vec![election(1, "a", true), election(2, "b", false)];
        save_collection(&mut store, StorageKey::Elections, &elections).unwrap();
        let org = Organization {
            id: "a".to_string(),
            name: "A".to_string(),
            organization_type: OrganizationType::Professional,
            description: None,
            user_id: "u".to_string(),
            created_at: at(0),
        };
        save_collection(&mut store, StorageKey::Organizations, &[org]).unwrap();

        let mut session = Session::load(store, "u").unwrap();
        assert!(!session.set_active_election(2).unwrap());
        assert!(session.set_active_election(1).unwrap());
        assert_eq!(session.active_election().unwrap().map(|e| e.id), Some(1));
        assert_eq!(session.all_elections().unwrap(), elections);
    }

    #[test]
    fn wizard_to_storage_and_back() {
        let _ = env_logger::try_init();
        let dir = scratch_dir("registry");
        let mut session = Session::load(FileStore::new(&dir), "current-user").unwrap();
        let org = session
            .create_organization(
                &OrganizationDraft {
                    name: "Gabon 2024".to_string(),
                    organization_type: Some(OrganizationType::Territorial),
                    description: "Presidential".to_string(),
                },
                at(1_700_000_000_000),
            )
            .unwrap()
            .unwrap();

        let draft = ElectionDraft {
            name: "Municipales".to_string(),
            election_type: "municipal".to_string(),
            date: "2024-08-26".to_string(),
            province: "Haut-Ogooue".to_string(),
            commune: "Moanda".to_string(),
            total_centers: 12,
            average_bureaux: 4,
            total_voters: 15_240,
            ..ElectionDraft::default()
        };
        let mut wizard = ElectionWizard::with_draft(org.organization_type, draft);
        while wizard.next() {}
        let submitted = wizard.submit(&org.id);
        let stored = session.add_election(submitted, at(1_700_000_000_500)).unwrap();
        assert_eq!(stored.bureaux, 48);
        assert!(stored.is_active);

        let reloaded = Session::load(FileStore::new(&dir), "current-user").unwrap();
        assert_eq!(reloaded.current_organization(), Some(&org));
        assert_eq!(reloaded.elections().unwrap(), vec![stored.clone()]);
        assert_eq!(reloaded.active_election().unwrap(), Some(stored));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
