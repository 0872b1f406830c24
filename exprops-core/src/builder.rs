use std::any::{Any, TypeId};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use exprops_cache::{CacheStrategy, ExpiringCacheStrategy};

use crate::context::InvocationContext;
use crate::converter::{Converter, DefaultConverter, RootConverter};
use crate::error::{Error, Result};
use crate::expander::{SimpleVariableExpander, VariableExpander};
use crate::invocation::{
    EagerLoading, HandlerChain, Initialization, InvocationCaching, InvocationKey, Middleware,
    Pipeline,
};
use crate::ordinal::sort_by_ordinal;
use crate::processor::{Processor, RootProcessor};
use crate::proxy::{Proxy, ProxyHandler};
use crate::resolver::{
    CompositeResolver, DefaultResolver, ExceptionIgnoringResolver, Resolver, RootResolver,
};
use crate::settings::{Settings, DEFAULT_CACHE_DURATION};
use crate::types::TargetType;
use crate::value::{PropertyType, Value};

/// Property holding the active profile.
pub const PROFILE_PROPERTY: &str = "externalizedproperties.profile";

type ProfileConfigurator = Box<dyn FnOnce(&str, Builder) -> Builder>;

struct ProfileConfiguration {
    /// Empty means every profile.
    profiles: Vec<String>,
    configure: ProfileConfigurator,
}

impl ProfileConfiguration {
    fn applies_to(&self, active: &str) -> bool {
        self.profiles.is_empty() || self.profiles.iter().any(|p| p == active)
    }
}

/// Entry point: creates proxies and exposes the pipeline directly.
///
/// ```ignore
/// let props = ExternalizedProperties::builder()
///     .defaults()
///     .resolver(MapResolver::new([("app.name", "demo")]))
///     .build()?;
///
/// let config: AppConfigProxy = props.initialize()?;
/// assert_eq!(config.name()?, "demo");
/// ```
pub struct ExternalizedProperties {
    chain: Arc<HandlerChain>,
    pipeline: Arc<Pipeline>,
    initialize_caching: bool,
    proxies: DashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ExternalizedProperties {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Validate `P`'s interface, wire it to the invocation chain and run
    /// middleware initialization (eager loading).
    pub fn initialize<P: Proxy>(&self) -> Result<P> {
        let type_id = TypeId::of::<P>();
        if self.initialize_caching {
            if let Some(proxy) = self
                .proxies
                .get(&type_id)
                .and_then(|entry| entry.downcast_ref::<P>().cloned())
            {
                return Ok(proxy);
            }
        }

        let interface = P::interface();
        interface.validate(self.pipeline.resolver().processor())?;
        let proxy = P::from_handler(ProxyHandler::new(self.chain.clone(), interface));
        let defaults = |index: usize| proxy.default_value(index);
        self.chain
            .initialize(&Initialization::new(interface, &defaults))?;
        tracing::debug!(
            interface = interface.name(),
            methods = interface.methods().len(),
            "proxy initialized"
        );

        if !self.initialize_caching {
            return Ok(proxy);
        }
        let entry = self
            .proxies
            .entry(type_id)
            .or_insert_with(|| Box::new(proxy.clone()));
        Ok(entry.downcast_ref::<P>().cloned().unwrap_or(proxy))
    }

    /// Expand and resolve `name` through the resolver chain, processors
    /// excluded.
    pub fn resolve_property(&self, name: &str) -> Result<Option<String>> {
        self.pipeline
            .resolver()
            .resolve(&InvocationContext::detached(), name)
    }

    pub fn resolve_property_as<T: PropertyType>(&self, name: &str) -> Result<Option<T>> {
        match self.resolve_property(name)? {
            Some(value) => self.convert(&value).map(Some),
            None => Ok(None),
        }
    }

    pub fn convert<T: PropertyType>(&self, value: &str) -> Result<T> {
        T::from_value(self.convert_to(value, &T::target_type())?)
    }

    pub fn convert_to(&self, value: &str, target: &TargetType) -> Result<Value> {
        target.validate()?;
        self.pipeline
            .converter()
            .convert(&InvocationContext::detached(), value, target)
    }

    pub fn expand_variables(&self, value: &str) -> Result<String> {
        self.pipeline
            .resolver()
            .expand_variables(&InvocationContext::detached(), value)
    }
}

/// Builder for [`ExternalizedProperties`].
///
/// Nothing is enabled by default. [`defaults`](Self::defaults) turns on the
/// default resolvers and converters, invocation caching, eager loading and
/// initialize caching.
pub struct Builder {
    resolvers: Vec<Arc<dyn Resolver>>,
    converters: Vec<Arc<dyn Converter>>,
    processors: Vec<Arc<dyn Processor>>,
    expander: Option<Arc<dyn VariableExpander>>,
    middleware: Vec<Arc<dyn Middleware>>,
    profiles: Vec<ProfileConfiguration>,
    default_resolvers: bool,
    default_converters: bool,
    invocation_caching: bool,
    eager_loading: bool,
    initialize_caching: bool,
    cache_duration: Duration,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            resolvers: Vec::new(),
            converters: Vec::new(),
            processors: Vec::new(),
            expander: None,
            middleware: Vec::new(),
            profiles: Vec::new(),
            default_resolvers: false,
            default_converters: false,
            invocation_caching: false,
            eager_loading: false,
            initialize_caching: false,
            cache_duration: DEFAULT_CACHE_DURATION,
        }
    }

    pub fn defaults(self) -> Self {
        self.enable_default_resolvers()
            .enable_default_converters()
            .enable_invocation_caching()
            .enable_eager_loading()
            .enable_initialize_caching()
    }

    /// Append a [`DefaultResolver`] (system properties, then environment)
    /// after the registered resolvers.
    pub fn enable_default_resolvers(mut self) -> Self {
        self.default_resolvers = true;
        self
    }

    /// Append a [`DefaultConverter`] after the registered converters.
    pub fn enable_default_converters(mut self) -> Self {
        self.default_converters = true;
        self
    }

    pub fn enable_invocation_caching(mut self) -> Self {
        self.invocation_caching = true;
        self
    }

    pub fn enable_eager_loading(mut self) -> Self {
        self.eager_loading = true;
        self
    }

    /// Memoize proxies: `initialize::<P>()` returns the same proxy every time.
    pub fn enable_initialize_caching(mut self) -> Self {
        self.initialize_caching = true;
        self
    }

    /// Lifetime of invocation cache entries, 30 minutes unless set.
    pub fn cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    /// Overwrite the flags and cache duration with `settings`.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.default_resolvers = settings.default_resolvers;
        self.default_converters = settings.default_converters;
        self.invocation_caching = settings.invocation_caching;
        self.eager_loading = settings.eager_loading;
        self.initialize_caching = settings.initialize_caching;
        self.cache_duration = settings.cache_duration;
        self
    }

    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    pub fn resolvers(mut self, resolvers: impl IntoIterator<Item = Arc<dyn Resolver>>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Arc::new(converter));
        self
    }

    pub fn converters(mut self, converters: impl IntoIterator<Item = Arc<dyn Converter>>) -> Self {
        self.converters.extend(converters);
        self
    }

    /// Register a processor under its [`Processor::name`]. Names must be
    /// unique.
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    pub fn processors(mut self, processors: impl IntoIterator<Item = Arc<dyn Processor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    /// Replace the default `${...}` expander.
    pub fn variable_expander(mut self, expander: impl VariableExpander + 'static) -> Self {
        self.expander = Some(Arc::new(expander));
        self
    }

    /// Add middleware around the built-in ones. The first added is the
    /// outermost.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Configuration applied only when one of `profiles` is active. An empty
    /// list applies to any active profile.
    ///
    /// ```ignore
    /// ExternalizedProperties::builder()
    ///     .on_profiles(["dev", "test"])
    ///     .apply(|profile, builder| builder.resolver(MapResolver::single("profile", profile)))
    /// ```
    pub fn on_profiles<I, S>(self, profiles: I) -> OnProfiles
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OnProfiles {
            builder: self,
            profiles: profiles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn build(mut self) -> Result<ExternalizedProperties> {
        if !self.profiles.is_empty() {
            self = self.apply_profiles()?;
        }

        let mut resolvers = std::mem::take(&mut self.resolvers);
        if self.default_resolvers {
            resolvers.push(Arc::new(DefaultResolver::new()));
        }
        sort_by_ordinal(&mut resolvers, |r| r.ordinal());

        let mut converters = std::mem::take(&mut self.converters);
        if self.default_converters {
            converters.push(Arc::new(DefaultConverter::new()));
        }

        let processor = RootProcessor::new(std::mem::take(&mut self.processors))?;
        let expander = match self.expander.take() {
            Some(expander) => expander,
            None => Arc::new(SimpleVariableExpander::new()),
        };

        let resolver = RootResolver::new(resolvers, expander, processor);
        let pipeline = Arc::new(Pipeline::new(resolver, RootConverter::new(converters)));

        let mut middleware = std::mem::take(&mut self.middleware);
        if self.invocation_caching || self.eager_loading {
            let cache: Arc<dyn CacheStrategy<InvocationKey, Value>> =
                Arc::new(ExpiringCacheStrategy::new(self.cache_duration));
            if self.invocation_caching {
                middleware.push(Arc::new(InvocationCaching::new(cache.clone())));
            }
            if self.eager_loading {
                middleware.push(Arc::new(EagerLoading::new(cache)));
            }
        }
        tracing::debug!(
            resolvers = pipeline.resolver().composite().len(),
            converters = pipeline.converter().converters().len(),
            middleware = middleware.len(),
            "externalized properties built"
        );

        Ok(ExternalizedProperties {
            chain: Arc::new(HandlerChain::new(middleware, pipeline.clone())),
            pipeline,
            initialize_caching: self.initialize_caching,
            proxies: DashMap::new(),
        })
    }

    fn apply_profiles(mut self) -> Result<Self> {
        let configurations = std::mem::take(&mut self.profiles);
        let Some(active) = self.active_profile()? else {
            tracing::debug!("no active profile");
            return Ok(self);
        };
        tracing::debug!(profile = %active, "active profile");
        for configuration in configurations {
            if configuration.applies_to(&active) {
                self = (configuration.configure)(&active, self);
            }
        }
        Ok(self)
    }

    /// Read [`PROFILE_PROPERTY`] through the registered resolvers, failures
    /// ignored, then the default resolvers. Blank means no profile.
    fn active_profile(&self) -> Result<Option<String>> {
        let mut resolvers: Vec<Arc<dyn Resolver>> = self
            .resolvers
            .iter()
            .map(|r| Arc::new(ExceptionIgnoringResolver::new(r.clone())) as Arc<dyn Resolver>)
            .collect();
        sort_by_ordinal(&mut resolvers, |r| r.ordinal());
        resolvers.push(Arc::new(DefaultResolver::new()));
        let profile = CompositeResolver::flatten(resolvers)
            .resolve(&InvocationContext::detached(), PROFILE_PROPERTY)
            .map_err(|e| {
                Error::Configuration(format!("failed to read '{PROFILE_PROPERTY}': {e}"))
            })?;
        Ok(profile
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()))
    }
}

/// Pending profile-specific configuration, see [`Builder::on_profiles`].
pub struct OnProfiles {
    builder: Builder,
    profiles: Vec<String>,
}

impl OnProfiles {
    /// `configure` receives the active profile and the builder.
    pub fn apply<F>(mut self, configure: F) -> Builder
    where
        F: FnOnce(&str, Builder) -> Builder + 'static,
    {
        self.builder.profiles.push(ProfileConfiguration {
            profiles: self.profiles,
            configure: Box::new(configure),
        });
        self.builder
    }
}
