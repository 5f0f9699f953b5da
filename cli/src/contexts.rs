use std::io::Write;
use std::path::PathBuf;

use dlspec_core::internal::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ContextsArgs {
    /// JSON settings mapping network types to {identifier: name} trees
    #[structopt(parse(from_os_str))]
    pub path: PathBuf,
    /// Only list contexts for this network type
    #[structopt(long)]
    pub network: Option<String>,
    /// Look a context up by identifier
    #[structopt(long)]
    pub find: Option<String>,
}

/// Registers a `ContextDescriptor` for every identifier of every network type
/// of a settings tree.
#[derive(Debug)]
struct SettingsDiscovery(Settings);

impl Discovery for SettingsDiscovery {
    fn name(&self) -> StaticName {
        "settings".into()
    }

    fn discover(&self, registry: &ExecutionContextRegistry) -> DlResult<()> {
        for network_type in self.0.keys() {
            let contexts = self.0.tree(network_type)?;
            for identifier in contexts.keys() {
                registry.register(ContextDescriptor::new(
                    identifier.to_string(),
                    contexts.get_string(identifier)?.to_string(),
                    NetworkType::new(network_type.to_string()),
                ))?;
            }
        }
        Ok(())
    }
}

impl ContextsArgs {
    pub fn run(&self) -> DlResult<()> {
        self.report(&mut std::io::stdout().lock())
    }

    pub fn report(&self, out: &mut dyn Write) -> DlResult<()> {
        let json = fs_err::read_to_string(&self.path)?;
        let settings = Settings::from_json(&json)
            .with_context(|| format!("Reading settings from {:?}", self.path))?;
        let registry = ExecutionContextRegistry::new();
        registry.discover(&SettingsDiscovery(settings))?;
        debug!("{registry:?}");

        if let Some(identifier) = &self.find {
            let context = registry
                .find_by_identifier(identifier)
                .with_context(|| format!("No execution context with identifier {identifier:?}"))?;
            writeln!(
                out,
                "{} {} ({})",
                context.network_type(),
                context.identifier(),
                context.name()
            )?;
            return Ok(());
        }
        let network_types = match &self.network {
            Some(nt) => vec![NetworkType::new(nt.clone())],
            None => registry.network_types(),
        };
        for network_type in network_types {
            writeln!(out, "{network_type}:")?;
            for context in registry.contexts_for(&network_type) {
                writeln!(out, "  {} ({})", context.identifier(), context.name())?;
            }
        }
        Ok(())
    }
}
