//! Map validation command implementation.

use super::CliError;
use pursuit::game::TemplateCell;
use pursuit::{MapTemplate, Role};
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the map file cannot be read or is invalid.
pub(crate) fn execute(map: &Path) -> Result<(), CliError> {
    println!("Validating: {}", map.display());
    println!();

    let template = match MapTemplate::load(map) {
        Ok(template) => {
            print_check("Map definition", true);
            template
        }
        Err(e) => {
            print_check("Map definition", false);
            return Err(e.into());
        }
    };

    let conf = &template.conf;
    let attackers = template.spawn_count(Role::Attacker);
    let defenders = template.spawn_count(Role::Defender);
    let coins = template.count(|c| matches!(c, TemplateCell::Coin));
    print_check("Has coins", coins > 0);

    println!();
    println!("Summary:");
    println!("  Board:        {}x{}", conf.width, conf.height);
    println!("  Attackers:    {attackers}");
    println!("  Defenders:    {defenders}");
    println!(
        "  Walls:        {}",
        template.count(|c| matches!(c, TemplateCell::Wall))
    );
    println!(
        "  Portals:      {}",
        template.count(|c| matches!(c, TemplateCell::Portal { .. }))
    );
    println!("  Coins:        {coins} x {} points", conf.coin_score);
    println!(
        "  Power-ups:    {} spawns",
        template.count(|c| matches!(c, TemplateCell::Powerup))
    );
    println!("  Max steps:    {}", conf.max_steps);
    println!("  Vision range: {}", conf.vision_range);
    if conf.refresh_interval > 0 {
        println!("  Refresh:      every {} ticks", conf.refresh_interval);
    }

    println!();
    if coins == 0 {
        println!("Warning: no coins, every match ends immediately.");
    } else {
        println!("Validation successful!");
    }

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
