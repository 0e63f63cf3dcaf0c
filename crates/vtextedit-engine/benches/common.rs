// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_source_text(blocks: usize) -> String {
    let base = [
        "fn example() {",
        "    let value = 42;",
        "\tprintln!(\"{}\", value);",
        "",
        "    // TODO tidy up the example",
        "}",
    ];

    let mut content = String::new();
    for i in 0..blocks {
        content.push_str(base[i % base.len()]);
        content.push('\n');
    }
    content
}

#[allow(dead_code)]
pub fn generate_long_lines(blocks: usize, width: usize) -> String {
    (0..blocks)
        .map(|i| format!("{i:>6} {}", "lorem ipsum ".repeat(width / 12)))
        .collect::<Vec<_>>()
        .join("\n")
}
