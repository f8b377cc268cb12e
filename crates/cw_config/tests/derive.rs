//! Round trips of derived types through a [`ConfigManager`].

use std::collections::{BTreeMap, HashMap};

use cw_config::store::{DataHolder, MemoryBackend, Node, Section};
use cw_config::{Config, ConfigError, ConfigManager};

// -----------------------------------------------------------------------------
// Types

#[derive(Config, Clone, Copy, Debug, Default, PartialEq)]
enum Mode {
    #[default]
    Survival,
    #[config(rename = "creative")]
    Creative,
}

#[derive(Config, Clone, Debug, PartialEq)]
#[config(record)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Server {
    host: String,
    #[config(comment = "Listening port")]
    port: u16,
    tags: Vec<String>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct App {
    server: Server,
    mode: Mode,
    points: Vec<Point>,
    spawn: Option<Point>,
    #[config(rename = "max-players")]
    max_players: u32,
    #[config(skip)]
    sessions: usize,
}

#[derive(Config, Clone, Debug, PartialEq)]
#[config(record)]
struct Credentials {
    user: String,
    #[config(default)]
    retries: u8,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Secured {
    credentials: Option<Credentials>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Warp {
    #[config(path)]
    name: String,
    target: Option<Point>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Warps {
    warps: BTreeMap<String, Warp>,
    aliases: HashMap<String, String>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Limits {
    connections: u32,
    timeout: f64,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Flattened {
    name: String,
    #[config(flatten)]
    limits: Limits,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

#[derive(Config, Clone, Debug, PartialEq)]
#[config(constructor = Version::new)]
struct Version {
    major: u32,
    minor: u32,
}

impl Version {
    fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Versioned {
    version: Option<Version>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Bounded {
    limits: Option<Limits>,
    plain: Limits,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
struct Sparse {
    items: Vec<Option<i32>>,
}

#[derive(Config, Clone, Debug, Default, PartialEq)]
#[config(post_init = clamp)]
struct Volume {
    level: i32,
}

impl Volume {
    fn clamp(&mut self) {
        self.level = self.level.clamp(0, 100);
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn saved<T: cw_config::info::Configurable>(value: T) -> Section {
    let mut manager = ConfigManager::new();
    manager.bind_target(value).unwrap();
    manager.save_all(true).unwrap();
    manager.backend().stored().cloned().unwrap()
}

fn loaded<T: cw_config::info::Configurable>(initial: T, document: Section) -> Result<T, ConfigError> {
    let mut manager = ConfigManager::with_backend(MemoryBackend::with_document(document));
    manager.bind_target(initial)?;
    manager.load_all()?;
    Ok(manager.into_target::<T>().unwrap())
}

fn sample_app() -> App {
    App {
        server: Server {
            host: "example.org".into(),
            port: 25565,
            tags: vec!["eu".into(), "pvp".into()],
        },
        mode: Mode::Creative,
        points: vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
        spawn: Some(Point { x: -5, y: 0 }),
        max_players: 20,
        sessions: 3,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn populated_round_trip() {
    let document = saved(sample_app());

    assert_eq!(document.get_string("mode").as_deref(), Some("creative"));
    assert_eq!(document.get_string("max-players").as_deref(), Some("20"));
    assert!(!document.is_set("sessions"));
    assert_eq!(
        document.section("server").unwrap().comments("port"),
        Some(&[String::from("Listening port")][..])
    );

    let app = loaded(App::default(), document).unwrap();
    assert_eq!(app, App { sessions: 0, ..sample_app() });
}

#[test]
fn lists_of_records() {
    let document = saved(sample_app());

    let points = document.list("points").unwrap();
    assert_eq!(points.len(), 2);
    let second = points.get_subsection("1").unwrap();
    assert_eq!(second.get_string("x").as_deref(), Some("3"));
    assert_eq!(second.get_string("y").as_deref(), Some("4"));

    let app = loaded(App::default(), document).unwrap();
    assert_eq!(app.points, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);
}

#[test]
fn resaving_is_idempotent() {
    let first = saved(sample_app());
    let reloaded = loaded(App::default(), first.clone()).unwrap();
    let second = saved(reloaded);
    assert_eq!(first, second);
}

#[test]
fn absent_keys_keep_defaults() {
    let document = Section::new()
        .with("server", Section::new().with("port", 8080_i64))
        .with("max-players", "64");

    let initial = sample_app();
    let app = loaded(initial.clone(), document).unwrap();

    assert_eq!(app.server.port, 8080);
    assert_eq!(app.server.host, "example.org");
    assert_eq!(app.server.tags, initial.server.tags);
    assert_eq!(app.max_players, 64);
    assert_eq!(app.points, initial.points);
    assert_eq!(app.spawn, initial.spawn);
}

#[test]
fn errors_carry_full_paths() {
    let document = Section::new().with("server", Section::new().with("port", "abc"));
    let err = loaded(App::default(), document).unwrap_err();
    assert!(
        matches!(&err, ConfigError::InvalidValue { path, .. } if path == "server.port"),
        "{err:?}"
    );

    let document = Section::new().with("mode", "HARDCORE");
    let err = loaded(App::default(), document).unwrap_err();
    assert!(
        matches!(&err, ConfigError::UnknownEnumCase { name, path, .. } if name == "HARDCORE" && path == "mode"),
        "{err:?}"
    );

    let document = Section::new().with("server", "not a section");
    let err = loaded(App::default(), document).unwrap_err();
    assert!(matches!(&err, ConfigError::InvalidValue { path, .. } if path == "server"));
}

#[test]
fn records_use_field_defaults() {
    let document = Section::new().with("credentials", Section::new().with("user", "admin"));
    let secured = loaded(Secured::default(), document).unwrap();
    assert_eq!(
        secured.credentials,
        Some(Credentials {
            user: "admin".into(),
            retries: 0,
        })
    );

    let document = Section::new().with("credentials", Section::new().with("retries", 2_i64));
    let err = loaded(Secured::default(), document).unwrap_err();
    assert!(matches!(err, ConfigError::MissingValue { field: "user", .. }));
}

#[test]
fn records_merge_into_current_values() {
    let point = loaded(Point { x: 1, y: 2 }, Section::new().with("x", 5_i64)).unwrap();
    assert_eq!(point, Point { x: 5, y: 2 });

    let version = loaded(Version::new(1, 2), Section::new().with("minor", 5_i64)).unwrap();
    assert_eq!(version, Version::new(1, 5));

    let document = Section::new().with("spawn", Section::new().with("y", 9_i64));
    let app = loaded(sample_app(), document).unwrap();
    assert_eq!(app.spawn, Some(Point { x: -5, y: 9 }));

    let secured = Secured {
        credentials: Some(Credentials {
            user: "admin".into(),
            retries: 3,
        }),
    };
    let document = Section::new().with("credentials", Section::new().with("retries", 1_i64));
    assert_eq!(
        loaded(secured, document).unwrap().credentials,
        Some(Credentials {
            user: "admin".into(),
            retries: 1,
        })
    );
}

#[test]
fn optional_values() {
    let document = saved(App {
        spawn: None,
        ..sample_app()
    });
    assert!(!document.is_set("spawn"));

    // Absent keys leave the current value alone.
    let app = loaded(sample_app(), document).unwrap();
    assert_eq!(app.spawn, Some(Point { x: -5, y: 0 }));
}

#[test]
fn maps_of_objects_receive_their_key() {
    let mut warps = Warps::default();
    warps.warps.insert(
        "home".into(),
        Warp {
            name: "home".into(),
            target: Some(Point { x: 7, y: 8 }),
        },
    );
    warps.warps.insert(
        "void".into(),
        Warp {
            name: "void".into(),
            target: None,
        },
    );
    warps.aliases.insert("h".into(), "home".into());

    let document = saved(warps.clone());
    let home = document.section("warps").unwrap().section("home").unwrap();
    assert!(!home.is_set("name"));
    assert!(home.is_set("target"));

    assert_eq!(loaded(Warps::default(), document).unwrap(), warps);
}

#[test]
fn flattened_fields_share_the_section() {
    let value = Flattened {
        name: "edge".into(),
        limits: Limits {
            connections: 12,
            timeout: 1.5,
        },
    };
    let document = saved(value.clone());
    assert_eq!(document.get("connections"), Some(&Node::from(12_i64)));
    assert_eq!(document.get("timeout"), Some(&Node::from(1.5_f64)));
    assert!(!document.is_set("limits"));

    assert_eq!(loaded(Flattened::default(), document).unwrap(), value);
}

#[test]
fn recursive_types() {
    let tree = Tree {
        label: "root".into(),
        children: vec![
            Tree {
                label: "a".into(),
                children: vec![Tree {
                    label: "a1".into(),
                    children: Vec::new(),
                }],
            },
            Tree {
                label: "b".into(),
                children: Vec::new(),
            },
        ],
    };
    let document = saved(tree.clone());
    assert_eq!(loaded(Tree::default(), document).unwrap(), tree);
}

#[test]
fn explicit_constructors() {
    let value = Versioned {
        version: Some(Version::new(1, 21)),
    };
    let document = saved(value.clone());
    assert_eq!(loaded(Versioned::default(), document).unwrap(), value);
}

#[test]
fn post_init_runs_after_load() {
    let document = Section::new().with("level", 250_i64);
    let volume = loaded(Volume::default(), document).unwrap();
    assert_eq!(volume.level, 100);
}

#[test]
fn saving_without_overwrite_merges() {
    let existing = Section::new()
        .with("max-players", 5_i64)
        .with("server", Section::new().with("host", "kept"))
        .with("unrelated", true);

    let mut manager = ConfigManager::with_backend(MemoryBackend::with_document(existing));
    manager.bind_target(sample_app()).unwrap();
    manager.save_defaults().unwrap();

    let document = manager.backend().stored().unwrap();
    assert_eq!(document.get_string("max-players").as_deref(), Some("5"));
    assert_eq!(document.get_string("unrelated").as_deref(), Some("true"));
    let server = document.section("server").unwrap();
    assert_eq!(server.get_string("host").as_deref(), Some("kept"));
    assert_eq!(server.get_string("port").as_deref(), Some("25565"));
}

#[test]
fn saving_without_overwrite_merges_optional_sections() {
    let existing = Section::new()
        .with("limits", Section::new().with("connections", 5_i64))
        .with("plain", Section::new().with("connections", 5_i64));
    let limits = Limits {
        connections: 12,
        timeout: 1.5,
    };

    let mut manager = ConfigManager::with_backend(MemoryBackend::with_document(existing));
    manager
        .bind_target(Bounded {
            limits: Some(limits.clone()),
            plain: limits,
        })
        .unwrap();
    manager.save_defaults().unwrap();

    let document = manager.backend().stored().unwrap();
    for key in ["limits", "plain"] {
        let section = document.section(key).unwrap();
        assert_eq!(section.get("connections"), Some(&Node::from(5_i64)), "{key}");
        assert_eq!(section.get("timeout"), Some(&Node::from(1.5_f64)), "{key}");
    }
}

#[test]
fn lists_reject_missing_elements() {
    let document = saved(Sparse {
        items: vec![Some(1), Some(2)],
    });
    assert_eq!(document.list("items").unwrap().len(), 2);

    let mut manager = ConfigManager::new();
    manager
        .bind_target(Sparse {
            items: vec![Some(1), None, Some(3)],
        })
        .unwrap();
    let err = manager.save_all(true).unwrap_err();
    assert!(
        matches!(&err, ConfigError::InvalidValue { path, .. } if path == "items.1"),
        "{err:?}"
    );
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_files() {
    use cw_config::store::YamlFileBackend;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yml");

    let mut manager = ConfigManager::with_backend(YamlFileBackend::new(&path));
    manager.bind_target(sample_app()).unwrap();
    manager.save_all(true).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("mode: creative"));

    let mut manager = ConfigManager::with_backend(YamlFileBackend::new(&path));
    manager.bind_target(App::default()).unwrap();
    manager.load_all().unwrap();
    assert_eq!(
        manager.into_target::<App>().unwrap(),
        App {
            sessions: 0,
            ..sample_app()
        }
    );
}
