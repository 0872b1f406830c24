use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use exprops::prelude::*;
use exprops::processor::Base64DecodeProcessor;

#[derive(Debug, Clone, PartialEq, PropertyType)]
enum Level {
    Low,
    High,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Level::Low),
            "high" => Ok(Level::High),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

#[externalized(prefix = "app")]
trait AppConfig {
    #[property("name")]
    fn name(&self) -> Result<String>;

    #[property("port")]
    fn port(&self) -> Result<u16> {
        Ok(8080)
    }

    #[property("tags", delimiter = ";", strip_empty)]
    fn tags(&self) -> Result<Vec<String>>;

    #[property("secret")]
    #[process(base64_decode)]
    fn secret(&self) -> Result<String>;

    #[property("timeout")]
    fn timeout(&self) -> Result<Option<Duration>>;

    #[property("release", date_time_format = "%d.%m.%Y")]
    fn release(&self) -> Result<chrono::NaiveDate>;

    #[property("level")]
    fn level(&self) -> Result<Level>;

    fn summary(&self) -> Result<String> {
        Ok(format!("{}:{}", self.name()?, self.port()?))
    }
}

#[externalized]
trait Lookup {
    #[resolver_facade]
    fn resolve(&self, name: &str) -> Result<String>;

    #[resolver_facade]
    fn resolve_as(&self, name: &str, target: TargetType) -> Result<Value>;

    #[resolver_facade]
    fn resolve_or(&self, name: &str) -> Result<String> {
        Ok(format!("no {name}"))
    }

    #[converter_facade]
    fn convert(&self, value: &str, target: TargetType) -> Result<Value>;

    #[converter_facade]
    fn to_port(&self, value: String) -> Result<u16>;

    #[variable_expander_facade]
    fn expand(&self, value: &str) -> Result<String>;
}

#[externalized(prefix = "db", delimiter = "_", proxy = DatabaseSettings)]
pub trait Database {
    #[property("url")]
    fn url(&self) -> Result<String>;

    #[property("${env}_pool")]
    fn pool(&self) -> Result<usize> {
        Ok(4)
    }
}

mod db {
    use super::*;

    #[externalized(prefix = "db")]
    pub trait Settings {
        #[property("host")]
        fn host(&self) -> Result<String>;
    }
}

mod cache {
    use super::*;

    #[externalized(prefix = "cache")]
    pub trait Settings {
        #[property("host")]
        fn host(&self) -> Result<String>;

        #[property("port")]
        fn port(&self) -> Result<u16>;
    }
}

fn app_properties() -> MapResolver {
    MapResolver::new([
        ("app.name", "demo"),
        ("app.tags", "a;;b;"),
        ("app.secret", "c2VjcmV0"),
        ("app.release", "01.03.2024"),
        ("app.level", "high"),
    ])
}

fn props(resolver: impl Resolver + 'static) -> ExternalizedProperties {
    ExternalizedProperties::builder()
        .defaults()
        .resolver(resolver)
        .converter(FromStrConverter::<Level>::new())
        .processor(Base64DecodeProcessor::new())
        .build()
        .unwrap()
}

#[test]
fn test_annotated_trait_end_to_end() {
    let config: AppConfigProxy = props(app_properties()).initialize().unwrap();
    assert_eq!(config.name().unwrap(), "demo");
    assert_eq!(config.port().unwrap(), 8080);
    assert_eq!(config.tags().unwrap(), vec!["a", "b"]);
    assert_eq!(config.secret().unwrap(), "secret");
    assert_eq!(config.timeout().unwrap(), None);
    assert_eq!(
        config.release().unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
    assert_eq!(config.level().unwrap(), Level::High);
    assert_eq!(config.summary().unwrap(), "demo:8080");
}

#[test]
fn test_generated_interface_descriptors() {
    let interface = <AppConfigProxy as Proxy>::interface();
    assert_eq!(interface.name(), "AppConfig");
    let names: Vec<_> = interface.methods().iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        vec!["name", "port", "tags", "secret", "timeout", "release", "level"]
    );

    let port = &interface.methods()[1];
    assert_eq!(port.property_name(), Some("app.port"));
    assert!(port.has_default());
    assert_eq!(port.target(), &u16::target_type());

    let tags = &interface.methods()[2];
    assert_eq!(tags.attributes().delimiter(), ";");
    assert!(tags.attributes().strip_empty);
    assert_eq!(interface.methods()[3].processors()[0].name, "base64_decode");
    assert_eq!(
        interface.methods()[5].attributes().date_time_format,
        Some("%d.%m.%Y")
    );
}

#[test]
fn test_eager_loading_fails_for_missing_required_property() {
    let err = props(MapResolver::single("app.name", "demo"))
        .initialize::<AppConfigProxy>()
        .unwrap_err();
    assert!(err.is_unresolved());
}

#[test]
fn test_missing_processor_fails_initialization() {
    let props = ExternalizedProperties::builder()
        .enable_default_converters()
        .resolver(app_properties())
        .build()
        .unwrap();
    assert!(matches!(
        props.initialize::<AppConfigProxy>(),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_invocations_are_cached() {
    struct Counting {
        inner: MapResolver,
        calls: Arc<AtomicUsize>,
    }

    impl Resolver for Counting {
        fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
            if name == "app.name" {
                self.calls.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.resolve(ctx, name)
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let config: AppConfigProxy = props(Counting {
        inner: app_properties(),
        calls: calls.clone(),
    })
    .initialize()
    .unwrap();
    for _ in 0..3 {
        config.name().unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_facades() {
    let lookup: LookupProxy = props(MapResolver::new([
        ("app.port", "8443"),
        ("host", "db"),
    ]))
    .initialize()
    .unwrap();

    assert_eq!(lookup.resolve("app.port").unwrap(), "8443");
    assert!(lookup.resolve("app.missing").unwrap_err().is_unresolved());
    assert_eq!(
        lookup.resolve_as("app.port", u16::target_type()).unwrap(),
        Value::U16(8443)
    );
    assert_eq!(lookup.resolve_or("app.missing").unwrap(), "no app.missing");
    assert_eq!(
        lookup.convert("3,4", Vec::<u8>::target_type()).unwrap(),
        Value::List(vec![Value::U8(3), Value::U8(4)])
    );
    assert_eq!(lookup.to_port("443".to_string()).unwrap(), 443);
    assert_eq!(lookup.expand("${host}:${app.port}").unwrap(), "db:8443");
}

#[test]
fn test_custom_proxy_name_and_delimiter() {
    let settings: DatabaseSettings = props(MapResolver::new([
        ("db_url", "postgres://localhost"),
        ("env", "test"),
        ("db_test_pool", "16"),
    ]))
    .initialize()
    .unwrap();
    assert_eq!(settings.url().unwrap(), "postgres://localhost");
    assert_eq!(settings.pool().unwrap(), 16);

    assert_eq!(
        <DatabaseSettings as Proxy>::interface().methods()[1].property_name(),
        Some("db_${env}_pool")
    );
}

#[test]
fn test_proxies_work_as_trait_objects() {
    let config: AppConfigProxy = props(app_properties()).initialize().unwrap();
    let shared: Arc<dyn AppConfig + Send + Sync> = Arc::new(config);
    let handle = std::thread::spawn(move || shared.name().unwrap());
    assert_eq!(handle.join().unwrap(), "demo");
}

#[test]
fn test_same_named_traits_in_different_modules_are_cached_apart() {
    use cache::Settings as _;
    use db::Settings as _;

    let props = props(MapResolver::new([
        ("db.host", "db.local"),
        ("cache.host", "cache.local"),
        ("cache.port", "6379"),
    ]));
    let db: db::SettingsProxy = props.initialize().unwrap();
    let cache: cache::SettingsProxy = props.initialize().unwrap();

    assert_eq!(db.host().unwrap(), "db.local");
    assert_eq!(cache.host().unwrap(), "cache.local");
    assert_eq!(cache.port().unwrap(), 6379);
    assert_eq!(db.host().unwrap(), "db.local");

    let db_interface = <db::SettingsProxy as Proxy>::interface();
    let cache_interface = <cache::SettingsProxy as Proxy>::interface();
    assert_eq!(db_interface.name(), cache_interface.name());
    assert_ne!(db_interface.path(), cache_interface.path());
    assert!(db_interface.path().ends_with("db::Settings"));
    assert_eq!(db_interface.methods()[0].interface_path(), db_interface.path());
}
