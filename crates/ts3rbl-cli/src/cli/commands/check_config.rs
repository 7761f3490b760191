//! `ts3rbl check-config` - validate and summarize the configuration.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    match ctx.output_format {
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                "Configuration OK:".green().bold(),
                ctx.config_path.display()
            );
            println!();

            let server = &config.server;
            println!("{}", "TS3Server".bold());
            println!("  {} {}:{}", "server:".bold(), server.server_ip, server.server_port);
            println!("  {} {}", "virtual server:".bold(), server.server_id);
            println!("  {} {}", "login:".bold(), server.server_username);
            println!("  {} {}", "nickname:".bold(), server.bot_nick.cyan());
            println!("  {} {}", "home channel:".bold(), server.default_channel);

            println!("{}", "Logging".bold());
            println!("  {} {}", "file:".bold(), config.logging.log_file.display());
            let level = config
                .logging
                .log_level
                .map_or_else(|| "(not set, trace)".dimmed().to_string(), String::from);
            println!("  {} {}", "level:".bold(), level);

            let actions = &config.actions;
            println!("{}", "Actions".bold());
            println!("  {} {}", "on match:".bold(), actions.on_match.to_string().yellow());
            println!("  {} {}s", "ban time:".bold(), actions.ban_time);
            println!("  {} {}", "reason:".bold(), actions.reason);
            println!("  {} {}", "listed threshold:".bold(), actions.rbl_listed_number);
            println!("  {} {}s", "repeat window:".bold(), actions.repeat_window);

            println!("{}", "RBL".bold());
            println!("  {} {}s", "query timeout:".bold(), config.rbl.query_timeout);
            println!("  {} {}", "zones:".bold(), config.rbl.lists.len());
            for zone in &config.rbl.lists {
                println!("    {}", zone.dimmed());
            }
        }
    }

    Ok(())
}
