//! The `bolero init` command.

use anyhow::Result;

use bolero_store::BoleroConfig;

pub fn execute() -> Result<()> {
    // Create bolero.toml
    if std::path::Path::new("bolero.toml").exists() {
        println!("bolero.toml already exists, skipping.");
    } else {
        let config = format!(
            "# bolero configuration\n\n{}",
            BoleroConfig::default().to_toml()?
        );
        std::fs::write("bolero.toml", config)?;
        println!("Created bolero.toml");
    }

    // Create example vocabulary
    std::fs::create_dir_all("vocabulary")?;
    let example_path = std::path::Path::new("vocabulary/example.toml");
    if example_path.exists() {
        println!("vocabulary/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_VOCABULARY)?;
        println!("Created vocabulary/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: bolero validate --file vocabulary/example.toml");
    println!("  2. Run: bolero import --file vocabulary/example.toml");
    println!("  3. Run: bolero quiz new --size 4 --out quiz.json");

    Ok(())
}

const EXAMPLE_VOCABULARY: &str = r#"# Words to import with `bolero import --file vocabulary/example.toml`

[[words]]
word = "Haus"
meaning = "house"
class = "Noun"
gender = "Neuter"
tags = ["Home"]
see_also = ["Wohnung"]

[words.example]
source = "Das Haus ist sehr alt."
target = "The house is very old."

[[words]]
word = "Wohnung"
meaning = "flat"
class = "Noun"
gender = "Feminine"
tags = ["Home"]

[[words]]
word = "Tisch"
meaning = "table"
class = "Noun"
gender = "Masculine"
tags = ["Home"]

[[words]]
word = "gehen"
meaning = "to go"
class = "Verb"
tags = ["Travel"]

[words.verb_forms]
ich = "gehe"
du = "gehst"
er = "geht"
wir = "gehen"
ihr = "geht"
sie = "gehen"

[[words]]
word = "schnell"
meaning = "fast"
class = "Adjective"

[[words]]
word = "heute"
meaning = "today"
class = "Adverb"
tags = ["Time"]
"#;
