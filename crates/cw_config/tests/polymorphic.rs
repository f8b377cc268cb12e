//! Trait objects and subclassable composites persisted with `=type`.

use core::any::Any;

use cw_config::info::Configurable;
use cw_config::store::{DataHolder, MemoryBackend, Section, TYPE_KEY};
use cw_config::{Config, ConfigError, ConfigManager};

pub trait Animal: Any + Send + Sync {
    fn speak(&self) -> String;
}

cw_config::impl_polymorphic!(Animal);

#[derive(Config, Default, Debug, PartialEq)]
struct Dog {
    name: String,
    good: bool,
}

impl Animal for Dog {
    fn speak(&self) -> String {
        format!("{} barks", self.name)
    }
}

#[derive(Config, Debug, PartialEq)]
#[config(record)]
struct Cat {
    lives: u8,
}

impl Animal for Cat {
    fn speak(&self) -> String {
        format!("meows {} times", self.lives)
    }
}

#[derive(Config, Default, Debug, PartialEq)]
struct Rock {
    weight: u32,
}

#[derive(Config, Default)]
struct Zoo {
    keeper: String,
    star: Option<Box<dyn Animal>>,
    residents: Vec<Box<dyn Animal>>,
}

fn manager_with(document: Section) -> ConfigManager {
    let manager = ConfigManager::with_backend(MemoryBackend::with_document(document));
    let registry = manager.registry();
    assert!(registry.register_subclass::<Box<dyn Animal>, Dog>(|dog| Box::new(dog)));
    assert!(registry.register_subclass::<Box<dyn Animal>, Cat>(|cat| Box::new(cat)));
    assert!(!registry.register_subclass::<Box<dyn Animal>, Cat>(|cat| Box::new(cat)));
    manager
}

fn speeches(zoo: &Zoo) -> Vec<String> {
    zoo.star
        .iter()
        .chain(zoo.residents.iter())
        .map(|animal| animal.speak())
        .collect()
}

#[test]
fn implementations_round_trip() {
    let zoo = Zoo {
        keeper: "Sam".into(),
        star: Some(Box::new(Dog {
            name: "Rex".into(),
            good: true,
        })),
        residents: vec![
            Box::new(Cat { lives: 9 }),
            Box::new(Dog {
                name: "Fido".into(),
                good: false,
            }),
        ],
    };

    let mut manager = manager_with(Section::new());
    manager.bind_target(zoo).unwrap();
    manager.save_all(true).unwrap();

    let document = manager.document().clone();
    let star = document.section("star").unwrap();
    assert_eq!(star.get_string(TYPE_KEY), Some(Dog::descriptor().to_string()));
    assert_eq!(star.get_string("name").as_deref(), Some("Rex"));
    let first = document.list("residents").unwrap().get_subsection("0").unwrap();
    assert_eq!(first.get_string(TYPE_KEY), Some(Cat::descriptor().to_string()));

    let mut manager = manager_with(document);
    manager.bind_target(Zoo::default()).unwrap();
    manager.load_all().unwrap();
    let zoo = manager.target::<Zoo>().unwrap();
    assert_eq!(zoo.keeper, "Sam");
    assert_eq!(speeches(zoo), ["Rex barks", "meows 9 times", "Fido barks"]);
}

#[test]
fn short_names_are_accepted() {
    let document = Section::new().with(
        "star",
        Section::new().with(TYPE_KEY, "Cat").with("lives", 3_i64),
    );
    let mut manager = manager_with(document);
    manager.bind_target(Zoo::default()).unwrap();
    manager.load_all().unwrap();
    assert_eq!(speeches(manager.target::<Zoo>().unwrap()), ["meows 3 times"]);
}

#[test]
fn discriminant_errors() {
    let load = |star: Section| {
        let mut manager = manager_with(Section::new().with("star", star));
        manager.registry().register::<Rock>();
        manager.bind_target(Zoo::default()).unwrap();
        manager.load_all().unwrap_err()
    };

    let err = load(Section::new().with("name", "Rex"));
    assert!(
        matches!(&err, ConfigError::UnresolvableSubclass { name: None, path, .. } if path == "star"),
        "{err:?}"
    );

    let err = load(Section::new().with(TYPE_KEY, "Unicorn"));
    assert!(
        matches!(&err, ConfigError::UnresolvableSubclass { name: Some(name), path, .. } if name == "Unicorn" && path == "star"),
        "{err:?}"
    );

    let err = load(Section::new().with(TYPE_KEY, "Rock"));
    assert!(
        matches!(&err, ConfigError::SubclassMismatch { found, path, .. } if found == "Rock" && path == "star"),
        "{err:?}"
    );
}

#[test]
fn unregistered_implementations_cannot_be_saved() {
    #[derive(Config, Default)]
    struct Fish {
        fins: u8,
    }

    impl Animal for Fish {
        fn speak(&self) -> String {
            String::from("...")
        }
    }

    let mut manager = manager_with(Section::new());
    manager
        .bind_target(Zoo {
            star: Some(Box::new(Fish { fins: 2 })),
            ..Zoo::default()
        })
        .unwrap();
    let err = manager.save_all(true).unwrap_err();
    assert!(matches!(&err, ConfigError::SubclassMismatch { path, .. } if path == "star"), "{err:?}");
}

// -----------------------------------------------------------------------------
// Subclassable composites

#[derive(Config, Default, Debug, PartialEq)]
#[config(subclassable)]
struct Theme {
    accent: String,
}

#[derive(Config, Default, Debug, PartialEq)]
struct Ui {
    theme: Theme,
}

#[test]
fn subclassable_composites_write_their_own_name() {
    let mut manager = ConfigManager::new();
    manager
        .bind_target(Ui {
            theme: Theme {
                accent: "teal".into(),
            },
        })
        .unwrap();
    manager.save_all(true).unwrap();

    let theme = manager.document().section("theme").unwrap().clone();
    assert_eq!(theme.get_string(TYPE_KEY), Some(Theme::descriptor().to_string()));

    let mut manager = ConfigManager::with_backend(MemoryBackend::with_document(
        Section::new().with("theme", theme),
    ));
    manager.bind_target(Ui::default()).unwrap();
    manager.load_all().unwrap();
    assert_eq!(manager.target::<Ui>().unwrap().theme.accent, "teal");
}

// -----------------------------------------------------------------------------
// Link-time registration

#[cfg(feature = "auto_register")]
mod auto {
    use cw_config::store::{Section, TYPE_KEY};
    use cw_config::{Config, ConfigManager};

    pub trait Plugin: core::any::Any + Send + Sync {
        fn id(&self) -> u32;
    }

    cw_config::impl_polymorphic!(Plugin);

    #[derive(Config, Default)]
    #[config(implements = Plugin)]
    struct Metrics {
        id: u32,
    }

    impl Plugin for Metrics {
        fn id(&self) -> u32 {
            self.id
        }
    }

    #[derive(Config, Default)]
    struct Host {
        plugins: Vec<Box<dyn Plugin>>,
    }

    #[test]
    fn implementations_register_themselves() {
        let document = Section::new().with(
            "plugins",
            cw_config::store::ListSection::new()
                .with(Section::new().with(TYPE_KEY, "Metrics").with("id", 4_i64)),
        );
        let mut manager =
            ConfigManager::with_backend(cw_config::store::MemoryBackend::with_document(document));
        manager.bind_target(Host::default()).unwrap();
        manager.load_all().unwrap();

        let host = manager.target::<Host>().unwrap();
        let ids: Vec<u32> = host.plugins.iter().map(|plugin| plugin.id()).collect();
        assert_eq!(ids, [4]);
    }
}
