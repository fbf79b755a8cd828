//! Repository for CRUD operations on gardens and plants

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::schema::Schema;
use crate::command::{GardenFields, PlantFields, PlantSearch};
use crate::error::{Entity, GardenError, PersistenceError, Result};
use crate::model::{Garden, GardenId, Plant, PlantId};

const IN_MEMORY_URL: &str = ":memory:";
const SQLITE_SCHEME: &str = "sqlite://";

const PLANT_COLUMNS: &str =
    "id, name, common_name, category, location, year, notes, garden_id";

/// Repository owning the store connection
///
/// Every query and command goes through a `Repository` passed in by the
/// caller. Writes commit immediately; there is no caching between calls.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Create a new repository with the given database path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(PersistenceError::from)?;
        }

        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        tracing::debug!("Opened database at {:?}", path);
        Ok(repo)
    }

    /// Create an in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open a repository from a connection string
    ///
    /// Accepts `:memory:`, `sqlite://<path>` or a plain filesystem path.
    pub fn open(database_url: &str) -> Result<Self> {
        let target = database_url
            .strip_prefix(SQLITE_SCHEME)
            .unwrap_or(database_url);

        if target == IN_MEMORY_URL {
            Self::in_memory()
        } else {
            Self::new(target)
        }
    }

    /// Initialize the database schema
    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(Schema::pragmas())?;
        self.conn.execute_batch(Schema::create_tables())?;
        Ok(())
    }

    // ==================== Garden Operations ====================

    /// All gardens in insertion order
    pub fn list_gardens(&self) -> Result<Vec<Garden>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, notes FROM gardens ORDER BY id")?;

        let gardens = stmt
            .query_map([], Self::row_to_garden)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!("Listed {} gardens", gardens.len());
        Ok(gardens)
    }

    /// Get a garden by ID
    pub fn get_garden(&self, id: GardenId) -> Result<Option<Garden>> {
        let garden = self
            .conn
            .query_row(
                "SELECT id, name, notes FROM gardens WHERE id = ?1",
                [id],
                Self::row_to_garden,
            )
            .optional()?;

        Ok(garden)
    }

    /// Gardens matching `id`, as a zero- or one-element list
    pub fn search_gardens(&self, id: GardenId) -> Result<Vec<Garden>> {
        Ok(self.get_garden(id)?.into_iter().collect())
    }

    /// Insert a garden and return its assigned id
    pub fn create_garden(&self, fields: &GardenFields) -> Result<GardenId> {
        self.conn.execute(
            "INSERT INTO gardens (name, notes) VALUES (?1, ?2)",
            params![fields.name, fields.notes],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!("Created garden {}", id);
        Ok(id)
    }

    /// Replace the name and notes of an existing garden
    pub fn update_garden(&self, id: GardenId, fields: &GardenFields) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE gardens SET name = ?1, notes = ?2 WHERE id = ?3",
            params![fields.name, fields.notes, id],
        )?;

        if changed == 0 {
            return Err(GardenError::not_found(Entity::Garden, id));
        }

        tracing::info!("Updated garden {}", id);
        Ok(())
    }

    /// Delete a garden; its plants stay and lose their garden reference
    pub fn delete_garden(&mut self, id: GardenId) -> Result<()> {
        self.delete_exactly_one(Entity::Garden, id)
    }

    /// Plants belonging to a garden, ordered by id
    pub fn list_garden_plants(&self, garden_id: GardenId) -> Result<Vec<Plant>> {
        self.ensure_exists(Entity::Garden, garden_id)?;

        self.search_plants(&PlantSearch {
            garden_id: Some(garden_id),
            ..Default::default()
        })
    }

    fn row_to_garden(row: &rusqlite::Row) -> rusqlite::Result<Garden> {
        Ok(Garden {
            id: row.get(0)?,
            name: row.get(1)?,
            notes: row.get(2)?,
        })
    }

    // ==================== Plant Operations ====================

    /// Get a plant by ID
    pub fn get_plant(&self, id: PlantId) -> Result<Option<Plant>> {
        let plant = self
            .conn
            .query_row(
                &format!("SELECT {} FROM plants WHERE id = ?1", PLANT_COLUMNS),
                [id],
                Self::row_to_plant,
            )
            .optional()?;

        Ok(plant)
    }

    /// Insert a plant and return its assigned id
    ///
    /// A supplied `garden_id` must name an existing garden.
    pub fn create_plant(&self, fields: &PlantFields) -> Result<PlantId> {
        if let Some(garden_id) = fields.garden_id {
            self.ensure_exists(Entity::Garden, garden_id)?;
        }

        self.conn.execute(
            r#"
            INSERT INTO plants (name, common_name, category, location, year, notes, garden_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                fields.name,
                fields.common_name,
                fields.category,
                fields.location,
                fields.year,
                fields.notes,
                fields.garden_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!("Created plant {}", id);
        Ok(id)
    }

    /// Replace every field of an existing plant
    ///
    /// A missing plant is reported before a missing `garden_id`.
    pub fn update_plant(&self, id: PlantId, fields: &PlantFields) -> Result<()> {
        self.ensure_exists(Entity::Plant, id)?;
        if let Some(garden_id) = fields.garden_id {
            self.ensure_exists(Entity::Garden, garden_id)?;
        }

        let changed = self.conn.execute(
            r#"
            UPDATE plants
            SET name = ?1, common_name = ?2, category = ?3, location = ?4,
                year = ?5, notes = ?6, garden_id = ?7
            WHERE id = ?8
            "#,
            params![
                fields.name,
                fields.common_name,
                fields.category,
                fields.location,
                fields.year,
                fields.notes,
                fields.garden_id,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(GardenError::not_found(Entity::Plant, id));
        }

        tracing::info!("Updated plant {}", id);
        Ok(())
    }

    /// Plants matching every supplied filter, ordered by id
    pub fn search_plants(&self, search: &PlantSearch) -> Result<Vec<Plant>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(id) = search.id {
            clauses.push("id = ?");
            values.push(Value::Integer(id));
        }
        if let Some(ref name) = search.name {
            clauses.push("instr(name, ?) > 0");
            values.push(Value::Text(name.clone()));
        }
        if let Some(ref common_name) = search.common_name {
            clauses.push("instr(common_name, ?) > 0");
            values.push(Value::Text(common_name.clone()));
        }
        if let Some(ref category) = search.category {
            clauses.push("category = ?");
            values.push(Value::Text(category.clone()));
        }
        if let Some(ref location) = search.location {
            clauses.push("location = ?");
            values.push(Value::Text(location.clone()));
        }
        if let Some(year) = search.year {
            clauses.push("year = ?");
            values.push(Value::Integer(i64::from(year)));
        }
        if let Some(ref notes) = search.notes {
            clauses.push("instr(notes, ?) > 0");
            values.push(Value::Text(notes.clone()));
        }
        if let Some(garden_id) = search.garden_id {
            clauses.push("garden_id = ?");
            values.push(Value::Integer(garden_id));
        }

        let mut sql = format!("SELECT {} FROM plants", PLANT_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");
        tracing::debug!(%sql, unfiltered = search.is_unfiltered(), "Searching plants");

        let mut stmt = self.conn.prepare(&sql)?;
        let plants = stmt
            .query_map(params_from_iter(values), Self::row_to_plant)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(plants)
    }

    /// Delete a plant
    pub fn delete_plant(&mut self, id: PlantId) -> Result<()> {
        self.delete_exactly_one(Entity::Plant, id)
    }

    fn row_to_plant(row: &rusqlite::Row) -> rusqlite::Result<Plant> {
        Ok(Plant {
            id: row.get(0)?,
            name: row.get(1)?,
            common_name: row.get(2)?,
            category: row.get(3)?,
            location: row.get(4)?,
            year: row.get(5)?,
            notes: row.get(6)?,
            garden_id: row.get(7)?,
        })
    }

    // ==================== Shared ====================

    fn ensure_exists(&self, entity: Entity, id: i64) -> Result<()> {
        let exists: bool = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", entity.table()),
            [id],
            |row| row.get(0),
        )?;

        if exists {
            Ok(())
        } else {
            Err(GardenError::not_found(entity, id))
        }
    }

    /// Delete the single row with `id`, failing unless exactly one matches
    fn delete_exactly_one(&mut self, entity: Entity, id: i64) -> Result<()> {
        let table = entity.table();
        let tx = self.conn.transaction()?;

        let count: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table),
            [id],
            |row| row.get(0),
        )?;

        match count {
            0 => return Err(GardenError::not_found(entity, id)),
            1 => {}
            count => return Err(GardenError::Ambiguous { entity, id, count }),
        }

        tx.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
        tx.commit()?;

        tracing::info!("Deleted {} {}", entity, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(name: &str, common_name: &str, category: &str, location: &str) -> PlantFields {
        PlantFields {
            name: name.to_string(),
            common_name: common_name.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            year: 2021,
            notes: String::new(),
            garden_id: None,
        }
    }

    fn seeded() -> Repository {
        let repo = Repository::in_memory().unwrap();
        repo.create_plant(&plant("Ocimum basilicum", "Basil", "Herb", "Bed1"))
            .unwrap();
        repo.create_plant(&plant("Mentha", "Mint", "Herb", "Bed2"))
            .unwrap();
        repo.create_plant(&plant("Rosa", "Rose", "Flower", "Bed1"))
            .unwrap();
        repo
    }

    #[test]
    fn test_repository_creation() {
        let repo = Repository::in_memory().unwrap();
        assert!(repo.list_gardens().unwrap().is_empty());
        assert!(repo.search_plants(&PlantSearch::default()).unwrap().is_empty());
    }

    #[test]
    fn test_garden_crud() {
        let mut repo = Repository::in_memory().unwrap();

        // Create
        let id = repo
            .create_garden(&GardenFields::new("Back Yard", "sunny"))
            .unwrap();
        assert_eq!(id, 1);

        // List
        let gardens = repo.list_gardens().unwrap();
        assert_eq!(
            gardens,
            vec![Garden {
                id: 1,
                name: "Back Yard".to_string(),
                notes: "sunny".to_string(),
            }]
        );

        // Update
        repo.update_garden(id, &GardenFields::new("Back Yard", "shady"))
            .unwrap();
        let found = repo.search_gardens(id).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Back Yard");
        assert_eq!(found[0].notes, "shady");

        // Delete
        repo.delete_garden(id).unwrap();
        assert!(repo.search_gardens(id).unwrap().is_empty());
    }

    #[test]
    fn test_garden_ids_follow_insertion_order() {
        let repo = Repository::in_memory().unwrap();
        repo.create_garden(&GardenFields::new("Front", "")).unwrap();
        repo.create_garden(&GardenFields::new("Back", "")).unwrap();

        let names: Vec<_> = repo
            .list_gardens()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Front", "Back"]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut repo = Repository::in_memory().unwrap();
        let first = repo.create_garden(&GardenFields::new("A", "")).unwrap();
        repo.delete_garden(first).unwrap();

        let second = repo.create_garden(&GardenFields::new("B", "")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_update_missing_garden_is_not_found() {
        let repo = Repository::in_memory().unwrap();
        let err = repo
            .update_garden(99, &GardenFields::new("Nowhere", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            GardenError::NotFound {
                entity: Entity::Garden,
                id: 99
            }
        ));
    }

    #[test]
    fn test_delete_missing_garden_is_not_found() {
        let mut repo = Repository::in_memory().unwrap();
        let err = repo.delete_garden(5).unwrap_err();
        assert!(matches!(err, GardenError::NotFound { id: 5, .. }));
    }

    #[test]
    fn test_search_missing_garden_is_empty() {
        let repo = Repository::in_memory().unwrap();
        assert!(repo.search_gardens(1).unwrap().is_empty());
    }

    #[test]
    fn test_long_garden_name_is_constraint_error() {
        let repo = Repository::in_memory().unwrap();
        let name = "x".repeat(51);
        let err = repo
            .create_garden(&GardenFields::new(name, ""))
            .unwrap_err();
        assert!(matches!(err, GardenError::Constraint(_)));
        assert!(repo.list_gardens().unwrap().is_empty());
    }

    #[test]
    fn test_plant_crud() {
        let mut repo = Repository::in_memory().unwrap();

        let mut fields = plant("Rosa", "Rose", "Flower", "BedA");
        fields.notes = "needs pruning".to_string();
        let id = repo.create_plant(&fields).unwrap();

        let rows: Vec<_> = repo
            .search_plants(&PlantSearch {
                category: Some("Flower".to_string()),
                ..Default::default()
            })
            .unwrap()
            .into_iter()
            .map(Plant::into_row)
            .collect();
        assert_eq!(
            rows,
            vec![(
                1,
                "Rosa".to_string(),
                "Rose".to_string(),
                "Flower".to_string(),
                "BedA".to_string(),
                2021,
                "needs pruning".to_string()
            )]
        );

        fields.year = 2022;
        repo.update_plant(id, &fields).unwrap();
        assert_eq!(repo.get_plant(id).unwrap().unwrap().year, 2022);

        repo.delete_plant(id).unwrap();
        assert!(repo.get_plant(id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_plant_is_not_found() {
        let repo = Repository::in_memory().unwrap();
        let err = repo
            .update_plant(3, &plant("Rosa", "Rose", "Flower", "BedA"))
            .unwrap_err();
        assert!(matches!(
            err,
            GardenError::NotFound {
                entity: Entity::Plant,
                id: 3
            }
        ));
    }

    #[test]
    fn test_delete_missing_plant_is_not_found() {
        let mut repo = Repository::in_memory().unwrap();
        assert!(matches!(
            repo.delete_plant(1),
            Err(GardenError::NotFound {
                entity: Entity::Plant,
                ..
            })
        ));
    }

    #[test]
    fn test_search_unfiltered_returns_all() {
        let repo = seeded();
        let all = repo.search_plants(&PlantSearch::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_filters_are_anded() {
        let repo = seeded();
        let found = repo
            .search_plants(&PlantSearch {
                category: Some("Herb".to_string()),
                location: Some("Bed1".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].common_name, "Basil");
    }

    // Substring filters use instr, so "ros" does not find "Rose" even though
    // a LIKE-based search would; matching stays case-sensitive on purpose.
    #[test]
    fn test_search_substring_is_case_sensitive() {
        let repo = seeded();

        let hit = repo
            .search_plants(&PlantSearch {
                name: Some("Ros".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "Rosa");

        let miss = repo
            .search_plants(&PlantSearch {
                name: Some("ros".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_search_substring_treats_wildcards_literally() {
        let repo = seeded();
        let found = repo
            .search_plants(&PlantSearch {
                common_name: Some("%".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_search_by_id_and_year() {
        let repo = seeded();

        let by_id = repo
            .search_plants(&PlantSearch {
                id: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Mentha");

        let by_year = repo
            .search_plants(&PlantSearch {
                year: Some(1999),
                ..Default::default()
            })
            .unwrap();
        assert!(by_year.is_empty());
    }

    #[test]
    fn test_plant_with_missing_garden_is_rejected() {
        let repo = Repository::in_memory().unwrap();
        let mut fields = plant("Rosa", "Rose", "Flower", "BedA");
        fields.garden_id = Some(9);

        let err = repo.create_plant(&fields).unwrap_err();
        assert!(matches!(
            err,
            GardenError::NotFound {
                entity: Entity::Garden,
                id: 9
            }
        ));
        assert!(repo.search_plants(&PlantSearch::default()).unwrap().is_empty());
    }

    #[test]
    fn test_garden_plants_relationship() {
        let mut repo = Repository::in_memory().unwrap();
        let garden = repo
            .create_garden(&GardenFields::new("Herb Spiral", ""))
            .unwrap();

        let mut basil = plant("Ocimum basilicum", "Basil", "Herb", "Top");
        basil.garden_id = Some(garden);
        let basil_id = repo.create_plant(&basil).unwrap();
        repo.create_plant(&plant("Rosa", "Rose", "Flower", "BedA"))
            .unwrap();

        let owned = repo.list_garden_plants(garden).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, basil_id);

        // Deleting the garden detaches its plants
        repo.delete_garden(garden).unwrap();
        let orphan = repo.get_plant(basil_id).unwrap().unwrap();
        assert_eq!(orphan.garden_id, None);

        assert!(matches!(
            repo.list_garden_plants(garden),
            Err(GardenError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_plant_with_missing_garden_keeps_plant() {
        let repo = Repository::in_memory().unwrap();
        let garden = repo
            .create_garden(&GardenFields::new("Orchard", ""))
            .unwrap();

        let mut fields = plant("Malus", "Apple", "Tree", "Row1");
        fields.garden_id = Some(garden);
        let id = repo.create_plant(&fields).unwrap();

        fields.garden_id = Some(99);
        fields.year = 2030;
        let err = repo.update_plant(id, &fields).unwrap_err();
        assert!(matches!(
            err,
            GardenError::NotFound {
                entity: Entity::Garden,
                id: 99
            }
        ));

        let unchanged = repo.get_plant(id).unwrap().unwrap();
        assert_eq!(unchanged.garden_id, Some(garden));
        assert_eq!(unchanged.year, 2021);

        // Omitting garden_id on a full replace detaches the plant
        fields.garden_id = None;
        repo.update_plant(id, &fields).unwrap();
        let detached = repo.get_plant(id).unwrap().unwrap();
        assert_eq!(detached.garden_id, None);
        assert_eq!(detached.year, 2030);
    }

    #[test]
    fn test_update_missing_plant_reported_before_missing_garden() {
        let repo = Repository::in_memory().unwrap();
        let mut fields = plant("Malus", "Apple", "Tree", "Row1");
        fields.garden_id = Some(4);

        let err = repo.update_plant(12, &fields).unwrap_err();
        assert!(matches!(
            err,
            GardenError::NotFound {
                entity: Entity::Plant,
                id: 12
            }
        ));
    }

    #[test]
    fn test_open_accepts_connection_strings() {
        let repo = Repository::open(":memory:").unwrap();
        assert!(repo.list_gardens().unwrap().is_empty());

        let repo = Repository::open("sqlite://:memory:").unwrap();
        assert!(repo.list_gardens().unwrap().is_empty());
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gardens.db");

        {
            let repo = Repository::new(&path).unwrap();
            repo.create_garden(&GardenFields::new("Allotment", "plot 12"))
                .unwrap();
        }

        let repo = Repository::open(&format!("sqlite://{}", path.display())).unwrap();
        let gardens = repo.list_gardens().unwrap();
        assert_eq!(gardens.len(), 1);
        assert_eq!(gardens[0].notes, "plot 12");
    }
}
