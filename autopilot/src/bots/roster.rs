use super::*;

pub(super) fn hunter_bot_configs() -> &'static [HunterConfig] {
    &[
        HunterConfig {
            id: "hunter-steady",
            description: "Patient sniper that holds the center and only fires on a clean line.",
            fire_tolerance: 0.08,
            fire_distance: 320.0,
            approach_distance: 400.0,
            speed_soft_cap: 60.0,
            panic_distance: 18.0,
        },
        HunterConfig {
            id: "hunter-aggressive",
            description: "Chases the nearest rock under thrust with a loose trigger.",
            fire_tolerance: 0.2,
            fire_distance: 420.0,
            approach_distance: 140.0,
            speed_soft_cap: 180.0,
            panic_distance: 28.0,
        },
    ]
}

pub fn bot_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = hunter_bot_configs().iter().map(|cfg| cfg.id).collect();
    ids.push(SpinnerBot::ID);
    ids.push(IdleBot::ID);
    ids
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    let mut out: Vec<(&'static str, &'static str)> = hunter_bot_configs()
        .iter()
        .map(|cfg| (cfg.id, cfg.description))
        .collect();
    out.push((SpinnerBot::ID, SpinnerBot::DESCRIPTION));
    out.push((IdleBot::ID, IdleBot::DESCRIPTION));
    out
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot + Send>> {
    if let Some(cfg) = hunter_bot_configs().iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(HunterBot::new(*cfg)));
    }
    match id {
        SpinnerBot::ID => Some(Box::new(SpinnerBot::new())),
        IdleBot::ID => Some(Box::new(IdleBot::new())),
        _ => None,
    }
}

fn hash_json(value: &serde_json::Value) -> String {
    // FNV-1a over the canonical encoding.
    let encoded = value.to_string();
    let digest = encoded.bytes().fold(0xCBF2_9CE4_8422_2325u64, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01B3)
    });
    format!("fnv1a:{digest:016x}:len:{}", encoded.len())
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    let mut out = Vec::new();

    for cfg in hunter_bot_configs() {
        let config = serde_json::to_value(cfg).unwrap_or(serde_json::Value::Null);
        out.push(BotManifestEntry {
            id: cfg.id.to_string(),
            family: "hunter".to_string(),
            description: cfg.description.to_string(),
            config_hash: hash_json(&config),
            config,
        });
    }

    for (id, description) in [
        (SpinnerBot::ID, SpinnerBot::DESCRIPTION),
        (IdleBot::ID, IdleBot::DESCRIPTION),
    ] {
        let config = serde_json::json!({ "id": id });
        out.push(BotManifestEntry {
            id: id.to_string(),
            family: "scripted".to_string(),
            description: description.to_string(),
            config_hash: hash_json(&config),
            config,
        });
    }

    out
}

pub fn bot_fingerprint(id: &str) -> Option<String> {
    bot_manifest_entries()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_bot_can_be_created() {
        let ids = bot_ids();
        assert_eq!(ids.len(), describe_bots().len());
        for id in ids {
            let bot = create_bot(id).expect("listed bot must exist");
            assert_eq!(bot.id(), id);
            assert!(!bot.description().is_empty());
            assert!(bot_fingerprint(id).is_some());
        }
        assert!(create_bot("no-such-bot").is_none());
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        let a = bot_fingerprint("hunter-steady").expect("registered");
        let b = bot_fingerprint("hunter-aggressive").expect("registered");
        assert_eq!(Some(a.clone()), bot_fingerprint("hunter-steady"));
        assert_ne!(a, b);
    }
}
