//! Form payload example
//!
//! This example demonstrates:
//! - Sanitizing a single messy value with different leaf filters
//! - Keyed and broadcast container specifications, nested
//! - Literal defaults and a custom filter
//! - JSON-encoded payloads with the `expect-json` flag
//! - Checking required fields after sanitizing
//!
//! Run with `RUST_LOG=sanitize=debug` to see the engine's decisions.

use sanitize::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🧼 Sanitize-RS Form Payload Example");
    println!("====================================\n");

    let text = json!(
        " Example text stuff's.\n-499,00 kr\n§!\"#$&/()=?`Her er <p>den</p>\\ vi/ktige meldingen: <a>(thomas@tloberg.net)</a> æØå!?§!#$%&/()=?`^*;:"
    );
    let number = json!(" 342,3.4-200.01");

    // === Single values ===
    println!("📌 Single values");
    println!("   string:            {}", sanitize_variable(&text, &filters::string(), Flags::empty()));
    println!(
        "   string (raw html): {}",
        sanitize_variable(&text, &filters::string(), Flag::NoHtmlStrip | Flag::AllowQuotes)
    );
    println!("   double:            {}", sanitize_variable(&number, &filters::double(), Flags::empty()));
    println!(
        "   double (loose):    {}\n",
        sanitize_variable(&number, &filters::double(), Flag::NoValidation)
    );

    // === Containers ===
    let object = json!({"A": text, "B": text, "C": "12.5"});
    let deep = json!({"D": object, "E": object, "F": object});

    let spec = FilterSpec::keyed([
        (
            "D",
            FilterSpec::keyed([
                ("A", FilterSpec::from(filters::string().with(Flag::NoTrim))),
                ("C", FilterSpec::from(filters::double())),
            ]),
        ),
        ("F", FilterSpec::each(filters::filename())),
        ("page", FilterSpec::literal(1)),
        (
            "shout",
            FilterSpec::from(filters::custom(|value, _| {
                Some(json!(value.as_str()?.to_uppercase()))
            })),
        ),
    ]);

    let mut input = deep.clone();
    input["shout"] = json!("hello");
    let clean = sanitize_container(&input, &spec, Flags::empty());
    println!("📦 Nested container");
    println!("{}\n", serde_json::to_string_pretty(&clean)?);

    // === JSON payloads ===
    let body = json!(r#"{\"user\": {\"id\": \"42\", \"email\": \" ada@example.com \"}}"#);
    let spec = FilterSpec::keyed([(
        "user",
        FilterSpec::keyed([
            ("id", FilterSpec::from(filters::integer())),
            ("email", FilterSpec::from(filters::email())),
        ]),
    )]);
    let user = sanitize_container(&body, &spec, Flag::ExpectJson);
    println!("🔓 Escaped JSON body");
    println!("   {}\n", user);

    // === Required fields ===
    let required = RequireSpec::keyed([
        ("user", RequireSpec::keyed([("id", true), ("email", true)])),
        ("token", RequireSpec::labeled(true, "API token")),
    ]);
    println!("✅ Required fields");
    match find_missing_fields(&user, &required, Flags::empty()) {
        Ok(()) => println!("   all present"),
        Err(missing) => println!("   {} -> {}", missing, presence_to_value(&Err(missing.clone()))),
    }

    // === Verbose markers ===
    let sanitizer = Sanitizer::with_config(SanitizerConfig::from_yaml_str("invalid_policy: verbose")?);
    let verbose = sanitizer.sanitize_container(
        &json!({"year": "20x4", "when": "yesterday"}),
        &FilterSpec::keyed([
            ("year", FilterSpec::from(filters::year())),
            ("when", FilterSpec::from(filters::date())),
            ("tags", FilterSpec::each(filters::string())),
        ]),
        Flags::empty(),
    );
    println!("\n🗒️  Verbose markers");
    println!("   {}", verbose);

    Ok(())
}
