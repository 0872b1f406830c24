use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use exprops_core::resolver::{system, MapResolver};
use exprops_core::{
    ordered, Arguments, Error, ExternalizedProperties, InvocationContext, PropertyMethod, PropertyType,
    Proxy, ProxyHandler, ProxyInterface, Resolver, Result, Settings, PROFILE_PROPERTY,
};
use serial_test::serial;

#[derive(Debug, Clone)]
struct NameProxy(ProxyHandler);

impl Proxy for NameProxy {
    fn interface() -> &'static ProxyInterface {
        static INTERFACE: OnceLock<ProxyInterface> = OnceLock::new();
        INTERFACE.get_or_init(|| {
            ProxyInterface::new(
                "Name",
                vec![PropertyMethod::property("Name", "name", "app.name", String::target_type())],
            )
        })
    }

    fn from_handler(handler: ProxyHandler) -> Self {
        NameProxy(handler)
    }
}

impl NameProxy {
    fn name(&self) -> Result<String> {
        self.0.invoke(0, Arguments::new(), None)
    }
}

struct Counting {
    inner: MapResolver,
    calls: Arc<AtomicUsize>,
}

impl Resolver for Counting {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(ctx, name)
    }
}

// ── Resolver registration ───────────────────────────────────────────────

#[test]
fn test_registration_order_decides_precedence() {
    let props = ExternalizedProperties::builder()
        .resolver(MapResolver::single("app.name", "first"))
        .resolver(MapResolver::single("app.name", "second"))
        .build()
        .unwrap();
    assert_eq!(props.resolve_property("app.name").unwrap().as_deref(), Some("first"));
}

#[test]
fn test_ordinals_override_registration_order() {
    let props = ExternalizedProperties::builder()
        .resolver(MapResolver::single("app.name", "unordered"))
        .resolver(ordered(10, MapResolver::single("app.name", "ten")))
        .resolver(ordered(1, MapResolver::single("app.name", "one")))
        .build()
        .unwrap();
    assert_eq!(props.resolve_property("app.name").unwrap().as_deref(), Some("one"));
}

#[test]
#[serial]
fn test_default_resolvers_come_after_registered_ones() {
    system::set("exprops.builder.key", "system");
    let props = ExternalizedProperties::builder()
        .enable_default_resolvers()
        .resolver(MapResolver::single("exprops.builder.key", "map"))
        .build()
        .unwrap();
    assert_eq!(
        props.resolve_property("exprops.builder.key").unwrap().as_deref(),
        Some("map")
    );
    assert_eq!(
        props.resolve_property("os.name").unwrap().as_deref(),
        Some(std::env::consts::OS)
    );
    system::remove("exprops.builder.key");
}

#[test]
fn test_nothing_is_enabled_by_default() {
    let props = ExternalizedProperties::builder().build().unwrap();
    assert_eq!(props.resolve_property("os.name").unwrap(), None);
    assert!(matches!(
        props.convert::<u16>("80"),
        Err(Error::NoConverter { .. })
    ));
}

// ── Settings ────────────────────────────────────────────────────────────

#[test]
fn test_settings_file_drives_the_builder() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "exprops:\n  cache_duration: 50ms\n  default_converters: true\n  invocation_caching: true"
    )
    .unwrap();
    let settings = Settings::from_yaml_file(file.path()).unwrap();
    assert_eq!(settings.cache_duration, Duration::from_millis(50));
    assert!(settings.default_converters);
    assert!(!settings.eager_loading);

    let calls = Arc::new(AtomicUsize::new(0));
    let props = ExternalizedProperties::builder()
        .settings(&settings)
        .resolver(Counting {
            inner: MapResolver::single("app.name", "demo"),
            calls: calls.clone(),
        })
        .build()
        .unwrap();
    let proxy: NameProxy = props.initialize().unwrap();
    proxy.name().unwrap();
    proxy.name().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(props.convert::<u16>("80").unwrap(), 80);
}

#[test]
fn test_missing_settings_file_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Resource { .. }));
}

#[test]
fn test_malformed_settings_are_rejected() {
    assert!(Settings::from_yaml_str("exprops: [1, 2]").is_err());
    assert!(Settings::from_yaml_str("exprops:\n  eager_loading: maybe\n").is_err());
}

// ── Profiles ────────────────────────────────────────────────────────────

fn profile_builder(profile: Option<&str>) -> exprops_core::Builder {
    let mut builder = ExternalizedProperties::builder();
    if let Some(profile) = profile {
        builder = builder.resolver(MapResolver::single(PROFILE_PROPERTY, profile));
    }
    builder
        .on_profiles(["dev"])
        .apply(|_, builder| builder.resolver(MapResolver::single("app.name", "dev-name")))
        .on_profiles(["prod", "staging"])
        .apply(|profile, builder| {
            builder.resolver(MapResolver::single("app.name", format!("{profile}-name")))
        })
        .on_profiles(Vec::<String>::new())
        .apply(|profile, builder| builder.resolver(MapResolver::single("app.profile", profile)))
}

#[test]
#[serial]
fn test_profile_specific_configuration_applies_to_active_profile() {
    let props = profile_builder(Some("dev")).build().unwrap();
    assert_eq!(props.resolve_property("app.name").unwrap().as_deref(), Some("dev-name"));
    assert_eq!(props.resolve_property("app.profile").unwrap().as_deref(), Some("dev"));

    let props = profile_builder(Some("staging")).build().unwrap();
    assert_eq!(
        props.resolve_property("app.name").unwrap().as_deref(),
        Some("staging-name")
    );
}

#[test]
#[serial]
fn test_no_profile_configuration_without_active_profile() {
    let props = profile_builder(None).build().unwrap();
    assert_eq!(props.resolve_property("app.name").unwrap(), None);
    assert_eq!(props.resolve_property("app.profile").unwrap(), None);

    let props = profile_builder(Some("   ")).build().unwrap();
    assert_eq!(props.resolve_property("app.profile").unwrap(), None);
}

#[test]
#[serial]
fn test_profile_from_system_properties() {
    system::set(PROFILE_PROPERTY, "prod");
    let props = profile_builder(None).build();
    system::remove(PROFILE_PROPERTY);

    let props = props.unwrap();
    assert_eq!(props.resolve_property("app.name").unwrap().as_deref(), Some("prod-name"));
}

#[test]
#[serial]
fn test_failing_resolvers_do_not_block_profile_lookup() {
    struct Failing;

    impl Resolver for Failing {
        fn resolve(&self, _ctx: &InvocationContext<'_>, _name: &str) -> Result<Option<String>> {
            Err(Error::other("offline"))
        }
    }

    let props = ExternalizedProperties::builder()
        .resolver(Failing)
        .resolver(MapResolver::single(PROFILE_PROPERTY, "dev"))
        .on_profiles(["dev"])
        .apply(|_, builder| builder.enable_default_converters())
        .build()
        .unwrap();
    assert_eq!(props.convert::<u8>("7").unwrap(), 7);
}
