//! Storage layer for ananke data.
//!
//! Everything lives as plain JSON documents under `<root>/.ananke/`:
//!
//! - `index.json` - ID allocation counters
//! - `epics/EPC-001.json`, `tasks/TSK-001.json` - one document per entity
//! - `deps/blocks.json` - the flat "blocks" edge list
//! - `packs/` - rendered context packs
//! - `schema.json` - canonical JSON Schema of the documents above
//!
//! Documents are read and written whole. Writes go through a temporary file
//! in the target directory followed by an atomic rename. There is no locking;
//! the last writer wins.

pub mod schema;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::models::{BlockEdge, EPIC_PREFIX, Epic, TASK_PREFIX, Task, WorkspaceIndex};
use crate::{Error, Result};

/// Name of the workspace data directory.
pub const WORKSPACE_DIR: &str = ".ananke";

const SKILL_MARKDOWN: &str = include_str!("embedded/SKILL.md");

/// Absolute locations of every workspace file and directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub ananke_dir: PathBuf,
    pub schema_file: PathBuf,
    pub index_file: PathBuf,
    pub epics_dir: PathBuf,
    pub tasks_dir: PathBuf,
    pub deps_dir: PathBuf,
    pub blocks_file: PathBuf,
    pub packs_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub config_file: PathBuf,
    pub agents_dir: PathBuf,
    pub skills_dir: PathBuf,
    pub skill_dir: PathBuf,
    pub skill_file: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: &Path) -> Self {
        let ananke_dir = root.join(WORKSPACE_DIR);
        let deps_dir = ananke_dir.join("deps");
        let agents_dir = root.join(".agents");
        let skills_dir = agents_dir.join("skills");
        let skill_dir = skills_dir.join("ananke");

        Self {
            root: root.to_path_buf(),
            schema_file: ananke_dir.join("schema.json"),
            index_file: ananke_dir.join("index.json"),
            epics_dir: ananke_dir.join("epics"),
            tasks_dir: ananke_dir.join("tasks"),
            blocks_file: deps_dir.join("blocks.json"),
            packs_dir: ananke_dir.join("packs"),
            logs_dir: ananke_dir.join("logs"),
            config_file: ananke_dir.join("config.kdl"),
            skill_file: skill_dir.join("SKILL.md"),
            deps_dir,
            ananke_dir,
            agents_dir,
            skills_dir,
            skill_dir,
        }
    }

    pub fn epic_file(&self, epic_id: &str) -> PathBuf {
        self.epics_dir.join(format!("{}.json", epic_id))
    }

    pub fn task_file(&self, task_id: &str) -> PathBuf {
        self.tasks_dir.join(format!("{}.json", task_id))
    }

    pub fn pack_file(&self, task_id: &str, extension: &str) -> PathBuf {
        self.packs_dir.join(format!("{}.{}", task_id, extension))
    }

    /// Render `target` relative to the workspace root, `/`-separated.
    pub fn relative(&self, target: &Path) -> String {
        match target.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => target.to_string_lossy().into_owned(),
        }
    }

    /// True when every piece a command needs is on disk.
    pub fn is_initialized(&self) -> bool {
        self.ananke_dir.is_dir()
            && self.index_file.is_file()
            && self.epics_dir.is_dir()
            && self.tasks_dir.is_dir()
            && self.deps_dir.is_dir()
            && self.blocks_file.is_file()
    }
}

/// Walk up from `start` to the nearest directory containing `.git`.
///
/// Falls back to `start` itself when no ancestor is a git checkout.
pub fn find_workspace_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}

/// How `init` treats an existing `.ananke` directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitMode {
    /// Fail if the workspace already exists
    #[default]
    Create,
    /// Fill in whatever is missing and refresh the skill guide
    Update,
    /// Delete `.ananke` and scaffold from scratch
    Reset,
}

/// Workspace-relative paths `init` created or refilled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub created: Vec<String>,
}

/// Storage manager for a single workspace.
pub struct Storage {
    paths: WorkspacePaths,
}

impl Storage {
    /// Open an initialized workspace.
    pub fn open(root: &Path) -> Result<Self> {
        let paths = WorkspacePaths::new(root);
        if !paths.is_initialized() {
            return Err(Error::NotInitialized);
        }
        Ok(Self { paths })
    }

    /// Scaffold the workspace at `root`.
    pub fn init(root: &Path, mode: InitMode) -> Result<InitReport> {
        let paths = WorkspacePaths::new(root);
        let existed = paths.ananke_dir.exists();

        if existed && mode == InitMode::Create {
            return Err(Error::Conflict(format!(
                "{} already exists (use --update or --reset to continue)",
                WORKSPACE_DIR
            )));
        }

        if existed && mode == InitMode::Reset {
            info!(path = %paths.ananke_dir.display(), "resetting workspace");
            fs::remove_dir_all(&paths.ananke_dir)?;
        }

        let mut report = InitReport::default();

        for dir in [
            &paths.ananke_dir,
            &paths.agents_dir,
            &paths.skills_dir,
            &paths.skill_dir,
            &paths.epics_dir,
            &paths.tasks_dir,
            &paths.deps_dir,
            &paths.packs_dir,
        ] {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                report.created.push(paths.relative(dir));
            }
        }

        let index = to_json_text(&WorkspaceIndex::new())?;
        let blocks = to_json_text(&Vec::<BlockEdge>::new())?;
        let schema = to_json_text(&schema::canonical_schema())?;

        ensure_file(&paths, &paths.index_file, &index, mode, false, &mut report)?;
        ensure_file(&paths, &paths.blocks_file, &blocks, mode, false, &mut report)?;
        ensure_file(&paths, &paths.skill_file, SKILL_MARKDOWN, mode, true, &mut report)?;
        ensure_file(&paths, &paths.schema_file, &schema, mode, false, &mut report)?;

        info!(created = report.created.len(), "workspace initialized");
        Ok(report)
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    // === Index ===

    pub fn read_index(&self) -> Result<WorkspaceIndex> {
        let label = self.index_label();
        let index: WorkspaceIndex = read_document(&self.paths.index_file, &label)?;
        index.validate().map_err(|reason| Error::InvalidDocument {
            document: label,
            reason,
        })?;
        Ok(index)
    }

    pub fn write_index(&self, index: &WorkspaceIndex) -> Result<()> {
        write_json(&self.paths.index_file, index)
    }

    // === Epics ===

    /// Allocate the next epic id, write the epic, and bump the index.
    ///
    /// The id and timestamps on `epic` are replaced.
    pub fn create_epic(&self, mut epic: Epic) -> Result<(Epic, PathBuf)> {
        let mut index = self.read_index()?;
        let id = format_id(EPIC_PREFIX, index.next_epic);
        let path = self.paths.epic_file(&id);

        if path.exists() {
            return Err(Error::Conflict(format!("Epic already exists: {}", id)));
        }

        let now = crate::models::now_timestamp();
        epic.id = id;
        epic.created_at = now.clone();
        epic.updated_at = now.clone();

        write_json(&path, &epic)?;
        index.next_epic += 1;
        index.updated_at = now;
        self.write_index(&index)?;

        info!(id = %epic.id, "created epic");
        Ok((epic, path))
    }

    /// Load an epic by id.
    pub fn read_epic(&self, epic_id: &str) -> Result<Epic> {
        let path = self.paths.epic_file(epic_id);
        let epic: Epic = read_entity(&path, "epic", "Epic", epic_id)?;
        epic.validate().map_err(|reason| Error::InvalidDocument {
            document: format!("epic file {}", epic_id),
            reason,
        })?;
        if epic.id != epic_id {
            return Err(Error::Conflict(format!(
                "Epic file id mismatch: expected {}",
                epic_id
            )));
        }
        Ok(epic)
    }

    pub fn write_epic(&self, epic: &Epic) -> Result<PathBuf> {
        let path = self.paths.epic_file(&epic.id);
        write_json(&path, epic)?;
        Ok(path)
    }

    /// All epics, ordered by file name.
    pub fn list_epics(&self) -> Result<Vec<Epic>> {
        let mut epics = Vec::new();
        for path in list_json_files(&self.paths.epics_dir)? {
            let label = format!("epic file {}", self.paths.relative(&path));
            let epic: Epic = read_document(&path, &label)?;
            epic.validate().map_err(|reason| Error::InvalidDocument {
                document: label,
                reason,
            })?;
            epics.push(epic);
        }
        Ok(epics)
    }

    // === Tasks ===

    /// Allocate the next task id, write the task, and bump the index.
    ///
    /// The id and timestamps on `task` are replaced. Whether the owning epic
    /// accepts new tasks is up to the caller.
    pub fn create_task(&self, mut task: Task) -> Result<(Task, PathBuf)> {
        let mut index = self.read_index()?;
        let id = format_id(TASK_PREFIX, index.next_task);
        let path = self.paths.task_file(&id);

        if path.exists() {
            return Err(Error::Conflict(format!("Task already exists: {}", id)));
        }

        let now = crate::models::now_timestamp();
        task.id = id;
        task.created_at = now.clone();
        task.updated_at = now.clone();

        write_json(&path, &task)?;
        index.next_task += 1;
        index.updated_at = now;
        self.write_index(&index)?;

        info!(id = %task.id, epic = %task.epic_id, "created task");
        Ok((task, path))
    }

    /// Load a task by id.
    pub fn read_task(&self, task_id: &str) -> Result<Task> {
        let path = self.paths.task_file(task_id);
        let task: Task = read_entity(&path, "task", "Task", task_id)?;
        task.validate().map_err(|reason| Error::InvalidDocument {
            document: format!("task file {}", task_id),
            reason,
        })?;
        if task.id != task_id {
            return Err(Error::Conflict(format!(
                "Task file id mismatch: expected {}",
                task_id
            )));
        }
        Ok(task)
    }

    pub fn write_task(&self, task: &Task) -> Result<PathBuf> {
        let path = self.paths.task_file(&task.id);
        write_json(&path, task)?;
        Ok(path)
    }

    /// All tasks, ordered by file name.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for path in list_json_files(&self.paths.tasks_dir)? {
            let label = format!("task file {}", self.paths.relative(&path));
            let task: Task = read_document(&path, &label)?;
            task.validate().map_err(|reason| Error::InvalidDocument {
                document: label,
                reason,
            })?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    // === Dependencies ===

    pub fn read_blocks(&self) -> Result<Vec<BlockEdge>> {
        let label = self.paths.relative(&self.paths.blocks_file);
        let edges: Vec<BlockEdge> = read_document(&self.paths.blocks_file, &label)?;
        for edge in &edges {
            edge.validate().map_err(|reason| Error::InvalidDocument {
                document: label.clone(),
                reason,
            })?;
        }
        Ok(edges)
    }

    pub fn write_blocks(&self, edges: &[BlockEdge]) -> Result<()> {
        write_json(&self.paths.blocks_file, edges)
    }

    // === Packs ===

    /// Write a rendered pack to `.ananke/packs/<task>.<ext>`.
    pub fn write_pack(&self, task_id: &str, extension: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.paths.packs_dir)?;
        let path = self.paths.pack_file(task_id, extension);
        write_atomic(&path, content.as_bytes())?;
        Ok(path)
    }

    fn index_label(&self) -> String {
        self.paths.relative(&self.paths.index_file)
    }
}

/// Format an id from its prefix and counter: `TSK-007`, `TSK-1234`.
pub fn format_id(prefix: &str, number: u64) -> String {
    format!("{}-{:03}", prefix, number)
}

/// Validate that an ID is `<prefix>-<digits>`.
pub fn validate_id(id: &str, prefix: &str) -> Result<()> {
    let valid = id
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));

    if !valid {
        return Err(Error::InvalidId(format!(
            "Invalid id '{}': expected {}-<number>",
            id, prefix
        )));
    }
    Ok(())
}

/// Validate an epic ID (EPC-001 format).
pub fn validate_epic_id(id: &str) -> Result<()> {
    validate_id(id, EPIC_PREFIX)
        .map_err(|_| Error::InvalidId(format!("Invalid epic id: {}", id)))
}

/// Validate a task ID (TSK-001 format).
pub fn validate_task_id(id: &str) -> Result<()> {
    validate_id(id, TASK_PREFIX)
        .map_err(|_| Error::InvalidId(format!("Invalid task id: {}", id)))
}

fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_atomic(path, to_json_text(value)?.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}

/// Read and parse a workspace-level document (index, blocks).
fn read_document<T: DeserializeOwned>(path: &Path, label: &str) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "read failed");
        Error::Conflict(format!("Failed reading {}", label))
    })?;
    parse_document(&raw, label)
}

/// Read an entity document, mapping a missing file to NOT_FOUND.
fn read_entity<T: DeserializeOwned>(path: &Path, kind: &str, title: &str, id: &str) -> Result<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound(format!("{} not found: {}", title, id)));
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "read failed");
            return Err(Error::Conflict(format!("Failed reading {} file: {}", kind, id)));
        }
    };
    parse_document(&raw, &format!("{} file {}", kind, id))
}

fn parse_document<T: DeserializeOwned>(raw: &str, label: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| Error::InvalidDocument {
        document: label.to_string(),
        reason: e.to_string(),
    })
}

fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Create `path` with `contents` if missing. In update mode an empty file is
/// refilled, and `replace_on_update` files are always rewritten.
fn ensure_file(
    paths: &WorkspacePaths,
    path: &Path,
    contents: &str,
    mode: InitMode,
    replace_on_update: bool,
    report: &mut InitReport,
) -> Result<()> {
    if !path.exists() {
        write_atomic(path, contents.as_bytes())?;
        report.created.push(paths.relative(path));
        return Ok(());
    }

    if mode != InitMode::Update {
        return Ok(());
    }

    if replace_on_update {
        write_atomic(path, contents.as_bytes())?;
        return Ok(());
    }

    if fs::metadata(path)?.len() == 0 {
        write_atomic(path, contents.as_bytes())?;
        report.created.push(paths.relative(path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EpicStatus, TaskStatus};
    use crate::test_utils::TestEnv;

    #[test]
    fn test_init_scaffolds_layout() {
        let env = TestEnv::new();
        let report = Storage::init(env.path(), InitMode::Create).unwrap();

        let paths = WorkspacePaths::new(env.path());
        assert!(paths.is_initialized());
        assert!(paths.schema_file.is_file());
        assert!(paths.skill_file.is_file());
        assert!(paths.packs_dir.is_dir());
        assert!(report.created.contains(&".ananke/index.json".to_string()));
        assert!(report.created.contains(&".ananke/deps/blocks.json".to_string()));
        assert!(report.created.contains(&".agents/skills/ananke/SKILL.md".to_string()));
    }

    #[test]
    fn test_init_twice_conflicts() {
        let env = TestEnv::init();
        let err = Storage::init(env.path(), InitMode::Create).unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_init_update_refills_empty_and_missing() {
        let env = TestEnv::init();
        let paths = WorkspacePaths::new(env.path());
        fs::write(&paths.blocks_file, "").unwrap();
        fs::remove_file(&paths.schema_file).unwrap();

        let report = Storage::init(env.path(), InitMode::Update).unwrap();
        assert_eq!(
            report.created,
            vec![
                ".ananke/deps/blocks.json".to_string(),
                ".ananke/schema.json".to_string()
            ]
        );
        assert!(env.storage().read_blocks().unwrap().is_empty());
    }

    #[test]
    fn test_init_update_keeps_data() {
        let env = TestEnv::init();
        let epic_id = env.epic("Keep me");

        let report = Storage::init(env.path(), InitMode::Update).unwrap();
        assert!(report.created.is_empty());
        assert_eq!(env.storage().read_epic(&epic_id).unwrap().title, "Keep me");
    }

    #[test]
    fn test_init_reset_wipes_data() {
        let env = TestEnv::init();
        env.epic("Gone");

        Storage::init(env.path(), InitMode::Reset).unwrap();
        let storage = env.storage();
        assert!(storage.list_epics().unwrap().is_empty());
        assert_eq!(storage.read_index().unwrap().next_epic, 1);
    }

    #[test]
    fn test_open_uninitialized() {
        let env = TestEnv::new();
        assert!(matches!(Storage::open(env.path()), Err(Error::NotInitialized)));
        assert!(!WorkspacePaths::new(env.path()).is_initialized());
    }

    #[test]
    fn test_open_partial_workspace_is_uninitialized() {
        let env = TestEnv::init();
        fs::remove_file(WorkspacePaths::new(env.path()).blocks_file).unwrap();
        assert!(matches!(Storage::open(env.path()), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_ids_allocated_sequentially() {
        let env = TestEnv::init();
        let first = env.epic("One");
        let second = env.epic("Two");
        assert_eq!(first, "EPC-001");
        assert_eq!(second, "EPC-002");

        let task = env.task(&first, "Task", 1);
        assert_eq!(task, "TSK-001");

        let index = env.storage().read_index().unwrap();
        assert_eq!(index.next_epic, 3);
        assert_eq!(index.next_task, 2);
    }

    #[test]
    fn test_create_refuses_to_overwrite() {
        let env = TestEnv::init();
        let storage = env.storage();
        let stale = storage.read_index().unwrap();
        env.epic("First");
        storage.write_index(&stale).unwrap();

        let err = storage
            .create_epic(Epic::new(String::new(), "Again".into(), "goal".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Epic already exists: EPC-001");
        assert_eq!(storage.read_epic("EPC-001").unwrap().title, "First");
    }

    #[test]
    fn test_read_missing_entities() {
        let env = TestEnv::init();
        let storage = env.storage();

        let err = storage.read_epic("EPC-009").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Epic not found: EPC-009");

        let err = storage.read_task("TSK-009").unwrap_err();
        assert_eq!(err.to_string(), "Task not found: TSK-009");
    }

    #[test]
    fn test_corrupt_task_is_conflict() {
        let env = TestEnv::init();
        let epic = env.epic("E");
        let task = env.task(&epic, "T", 2);
        let storage = env.storage();
        fs::write(storage.paths().task_file(&task), "{not json").unwrap();

        let err = storage.read_task(&task).unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
        assert!(storage.list_tasks().is_err());
    }

    #[test]
    fn test_id_mismatch_is_conflict() {
        let env = TestEnv::init();
        let epic_id = env.epic("E");
        let storage = env.storage();
        let mut epic = storage.read_epic(&epic_id).unwrap();
        epic.id = "EPC-777".into();
        fs::write(
            storage.paths().epic_file(&epic_id),
            serde_json::to_string(&epic).unwrap(),
        )
        .unwrap();

        let err = storage.read_epic(&epic_id).unwrap_err();
        assert_eq!(err.to_string(), "Epic file id mismatch: expected EPC-001");
    }

    #[test]
    fn test_round_trip_updates() {
        let env = TestEnv::init();
        let epic_id = env.epic("E");
        let task_id = env.task(&epic_id, "T", 3);
        let storage = env.storage();

        let mut epic = storage.read_epic(&epic_id).unwrap();
        epic.status = EpicStatus::Paused;
        storage.write_epic(&epic).unwrap();
        assert_eq!(storage.read_epic(&epic_id).unwrap().status, EpicStatus::Paused);

        let mut task = storage.read_task(&task_id).unwrap();
        task.status = TaskStatus::Doing;
        storage.write_task(&task).unwrap();
        assert_eq!(storage.list_tasks().unwrap()[0].status, TaskStatus::Doing);
    }

    #[test]
    fn test_blocks_round_trip() {
        let env = TestEnv::init();
        let storage = env.storage();
        let edges = vec![BlockEdge::new("TSK-001", "TSK-002")];
        storage.write_blocks(&edges).unwrap();
        assert_eq!(storage.read_blocks().unwrap(), edges);
    }

    #[test]
    fn test_invalid_blocks_file_is_conflict() {
        let env = TestEnv::init();
        let storage = env.storage();
        fs::write(&storage.paths().blocks_file, r#"{"from":"TSK-001"}"#).unwrap();

        let err = storage.read_blocks().unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
        assert!(err.to_string().contains(".ananke/deps/blocks.json"));
    }

    #[test]
    fn test_list_ignores_non_json_files() {
        let env = TestEnv::init();
        env.epic("E");
        let storage = env.storage();
        fs::write(storage.paths().epics_dir.join("README.txt"), "notes").unwrap();
        assert_eq!(storage.list_epics().unwrap().len(), 1);
    }

    #[test]
    fn test_write_pack() {
        let env = TestEnv::init();
        let storage = env.storage();
        let path = storage.write_pack("TSK-001", "md", "# pack\n").unwrap();
        assert_eq!(storage.paths().relative(&path), ".ananke/packs/TSK-001.md");
        assert_eq!(fs::read_to_string(path).unwrap(), "# pack\n");
    }

    #[test]
    fn test_find_workspace_root() {
        let env = TestEnv::new();
        let nested = env.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_workspace_root(&nested), nested);

        fs::create_dir(env.path().join(".git")).unwrap();
        assert_eq!(find_workspace_root(&nested), env.path());
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id("TSK", 7), "TSK-007");
        assert_eq!(format_id("EPC", 1234), "EPC-1234");
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_task_id("TSK-001").is_ok());
        assert!(validate_task_id("TSK-12345").is_ok());
        assert!(validate_epic_id("EPC-1").is_ok());

        assert!(validate_task_id("TSK-").is_err());
        assert!(validate_task_id("TSK-01a").is_err());
        assert!(validate_task_id("EPC-001").is_err());
        assert!(validate_task_id("tsk-001").is_err());
        assert!(validate_epic_id("EPC001").is_err());

        let err = validate_task_id("TSK-x").unwrap_err();
        assert_eq!(err.to_string(), "Invalid task id: TSK-x");
        assert_eq!(err.code(), "INVALID_ARGS");
    }
}
