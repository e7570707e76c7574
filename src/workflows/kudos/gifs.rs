use serde::Deserialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Deserialize)]
pub struct Gif {
    #[serde(rename = "URL")]
    pub url: String,
    pub tags: Vec<String>,
}

static CATALOG: LazyLock<Vec<Gif>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../../assets/gifs.json"))
        .expect("Failed to parse bundled GIF catalog")
});

/// Map a form vibe to its internal energy tag. Unknown vibes get otters.
pub fn energy_for_vibe(vibe: &str) -> &'static str {
    match vibe {
        "Appreciation for someone 🫂" => "appreciation",
        "Celebrating a victory 🏆" => "celebration",
        "Thankful for great teamwork ⚽️" => "thankful",
        "Amazed at awesome work ☄️" => "amazed",
        "Excited for the future 🎉" => "excited",
        "No vibes, just plants 🪴" => "plants",
        _ => "otter",
    }
}

/// Pick a random GIF whose tags match the vibe's energy.
pub fn pick_gif(vibe: &str) -> Option<&'static Gif> {
    let energy = energy_for_vibe(vibe);
    let matches: Vec<&Gif> = CATALOG
        .iter()
        .filter(|g| g.tags.iter().any(|t| t == energy))
        .collect();
    if matches.is_empty() {
        return None;
    }
    Some(matches[fastrand::usize(..matches.len())])
}
