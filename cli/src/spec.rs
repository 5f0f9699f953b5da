use std::io::Write;
use std::path::PathBuf;

use dlspec_core::internal::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct SpecArgs {
    /// JSON settings holding the network spec (inputs, hidden_outputs, outputs)
    #[structopt(parse(from_os_str))]
    pub path: PathBuf,
    /// Only show the tensor with this name
    #[structopt(long)]
    pub name: Option<String>,
    /// Key of the network spec tree in the file, if not at the root
    #[structopt(long)]
    pub key: Option<String>,
}

impl SpecArgs {
    pub fn run(&self) -> DlResult<()> {
        self.report(&mut std::io::stdout().lock())
    }

    pub fn report(&self, out: &mut dyn Write) -> DlResult<()> {
        let json = fs_err::read_to_string(&self.path)?;
        let settings = Settings::from_json(&json)
            .with_context(|| format!("Reading settings from {:?}", self.path))?;
        let network = match &self.key {
            Some(key) => settings.load::<NetworkSpec>(key)?,
            None => NetworkSpec::load_from(&settings)?,
        };
        if let Some(name) = &self.name {
            let spec = network
                .find_spec(name)
                .with_context(|| format!("No tensor named {name:?} in {:?}", self.path))?;
            writeln!(out, "{spec:?}")?;
            return Ok(());
        }
        for (title, specs) in [
            ("inputs", network.inputs()),
            ("hidden outputs", network.hidden_outputs()),
            ("outputs", network.outputs()),
        ] {
            writeln!(out, "{title}:")?;
            for spec in specs {
                writeln!(out, "  {spec:?}")?;
            }
        }
        if settings.contains("monitor") {
            let monitor: MonitoredQuantity =
                settings.load_or_legacy_default("monitor", MonitoredQuantity::default)?;
            writeln!(out, "monitor: {monitor} ({})", monitor.backend_identifier())?;
        }
        Ok(())
    }
}
