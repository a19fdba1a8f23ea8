use std::path::{Path, PathBuf};

use sled::IVec;
use uuid::Uuid;

use super::errors::GameError;
use super::types::{
    EncounterRecord, ItemInstance, PlayerRecord, ENCOUNTER_SCHEMA_VERSION, ITEM_SCHEMA_VERSION,
    PLAYER_SCHEMA_VERSION,
};

const TREE_PLAYERS: &str = "players";
const TREE_INVENTORY: &str = "inventory";
const TREE_ENCOUNTERS: &str = "encounters";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open(self.path)
    }
}

/// Sled-backed persistence for player ledgers, inventories, and active
/// encounters. One tree per record family; values are bincode with an
/// explicit schema version checked on every read.
pub struct GameStore {
    _db: sled::Db,
    players: sled::Tree,
    inventory: sled::Tree,
    encounters: sled::Tree,
}

impl GameStore {
    /// Open (or create) the game store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let inventory = db.open_tree(TREE_INVENTORY)?;
        let encounters = db.open_tree(TREE_ENCOUNTERS)?;
        Ok(Self {
            _db: db,
            players,
            inventory,
            encounters,
        })
    }

    fn player_key(player_id: &str) -> Vec<u8> {
        format!("players:{}", player_id).into_bytes()
    }

    fn item_key(player_id: &str, item_id: Uuid) -> Vec<u8> {
        format!("inv:{}:{}", player_id, item_id).into_bytes()
    }

    fn inventory_prefix(player_id: &str) -> Vec<u8> {
        format!("inv:{}:", player_id).into_bytes()
    }

    fn encounter_key(scope: &str) -> Vec<u8> {
        format!("enc:{}", scope).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or update a player ledger.
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let key = Self::player_key(&player.id);
        let bytes = Self::serialize(&player)?;
        self.players.insert(key, bytes)?;
        self.players.flush()?;
        Ok(())
    }

    /// Fetch a player ledger by id.
    pub fn get_player(&self, player_id: &str) -> Result<PlayerRecord, GameError> {
        let key = Self::player_key(player_id);
        let Some(bytes) = self.players.get(&key)? else {
            return Err(GameError::NotFound(format!("player: {}", player_id)));
        };
        let record: PlayerRecord = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Fetch a player ledger, creating a fresh one on first contact.
    pub fn get_or_create_player(&self, player_id: &str) -> Result<PlayerRecord, GameError> {
        match self.get_player(player_id) {
            Ok(record) => Ok(record),
            Err(GameError::NotFound(_)) => {
                let record = PlayerRecord::new(player_id);
                self.put_player(record.clone())?;
                Ok(record)
            }
            Err(err) => Err(err),
        }
    }

    /// List all player ids currently stored.
    pub fn list_player_ids(&self) -> Result<Vec<String>, GameError> {
        let mut ids = Vec::new();
        for entry in self.players.scan_prefix(b"players:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(player_id) = text.strip_prefix("players:") {
                ids.push(player_id.to_string());
            }
        }
        Ok(ids)
    }

    /// Insert or update one inventory item for a player.
    pub fn put_item(&self, player_id: &str, mut item: ItemInstance) -> Result<(), GameError> {
        item.schema_version = ITEM_SCHEMA_VERSION;
        let key = Self::item_key(player_id, item.id);
        let bytes = Self::serialize(&item)?;
        self.inventory.insert(key, bytes)?;
        self.inventory.flush()?;
        Ok(())
    }

    /// Fetch one inventory item.
    pub fn get_item(&self, player_id: &str, item_id: Uuid) -> Result<ItemInstance, GameError> {
        let key = Self::item_key(player_id, item_id);
        let Some(bytes) = self.inventory.get(&key)? else {
            return Err(GameError::NotFound(format!("item: {}", item_id)));
        };
        let record: ItemInstance = Self::deserialize(bytes)?;
        if record.schema_version != ITEM_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "item",
                expected: ITEM_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Remove one inventory item. Missing items are not an error: removal
    /// is idempotent so consumption can retry safely.
    pub fn remove_item(&self, player_id: &str, item_id: Uuid) -> Result<(), GameError> {
        let key = Self::item_key(player_id, item_id);
        self.inventory.remove(key)?;
        self.inventory.flush()?;
        Ok(())
    }

    /// All items a player holds, in key order.
    pub fn list_inventory(&self, player_id: &str) -> Result<Vec<ItemInstance>, GameError> {
        let prefix = Self::inventory_prefix(player_id);
        let items: Result<Vec<_>, _> = self
            .inventory
            .scan_prefix(&prefix)
            .map(|result| {
                result
                    .map_err(GameError::from)
                    .and_then(|(_key, value)| Self::deserialize(value))
            })
            .collect();
        items
    }

    /// Number of slots a player currently occupies.
    pub fn inventory_count(&self, player_id: &str) -> Result<usize, GameError> {
        let prefix = Self::inventory_prefix(player_id);
        Ok(self.inventory.scan_prefix(&prefix).count())
    }

    /// Insert or update the encounter for a scope. Scope-keying means a
    /// new encounter silently retires whatever held the scope before.
    pub fn put_encounter(&self, mut encounter: EncounterRecord) -> Result<(), GameError> {
        encounter.schema_version = ENCOUNTER_SCHEMA_VERSION;
        let key = Self::encounter_key(&encounter.scope);
        let bytes = Self::serialize(&encounter)?;
        self.encounters.insert(key, bytes)?;
        self.encounters.flush()?;
        Ok(())
    }

    /// Fetch the encounter occupying a scope.
    pub fn get_encounter(&self, scope: &str) -> Result<EncounterRecord, GameError> {
        let key = Self::encounter_key(scope);
        let Some(bytes) = self.encounters.get(&key)? else {
            return Err(GameError::NoActiveEncounter(scope.to_string()));
        };
        let record: EncounterRecord = Self::deserialize(bytes)?;
        if record.schema_version != ENCOUNTER_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "encounter",
                expected: ENCOUNTER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Explicitly deactivate the encounter in a scope.
    pub fn clear_encounter(&self, scope: &str) -> Result<(), GameError> {
        let key = Self::encounter_key(scope);
        self.encounters.remove(key)?;
        self.encounters.flush()?;
        Ok(())
    }
}
