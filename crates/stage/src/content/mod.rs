mod compiler;
mod database;
mod discovery;

pub use compiler::{
    compile_content_database, ContentCompileError, ContentErrorCode, SourceLocation,
};
pub use database::{
    CharacterDef, ContentDatabase, MissionCategory, MissionDef, MISSION_CATEGORIES,
};

use tracing::{info, warn};

use crate::AppPaths;

/// Loads the def database for a run. Content problems never stop startup:
/// a missing defs directory or a rejected def file degrades to the built-in
/// data with a warning.
pub fn load_content_database(paths: &AppPaths) -> ContentDatabase {
    if !paths.defs_dir.is_dir() {
        warn!(
            defs_dir = %paths.defs_dir.display(),
            "defs directory missing; using built-in content"
        );
        return ContentDatabase::builtin();
    }

    match compile_content_database(&paths.defs_dir) {
        Ok(database) => {
            let database = database.backfill_empty_pools();
            info!(
                missions = database.mission_count(),
                characters = database.character_count(),
                "content_loaded"
            );
            database
        }
        Err(error) => {
            warn!(error = %error, "content compile failed; using built-in content");
            ContentDatabase::builtin()
        }
    }
}
