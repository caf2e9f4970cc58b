use crate::config::ModeSwitchConfig;
use crate::error::Result;

pub struct ConfigCommand<'a> {
    config: &'a ModeSwitchConfig,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a ModeSwitchConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, json: bool) -> Result<()> {
        println!("{}", self.render(json)?);
        Ok(())
    }

    fn render(&self, json: bool) -> Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(self.config)?)
        } else {
            self.config.to_toml()
        }
    }
}
