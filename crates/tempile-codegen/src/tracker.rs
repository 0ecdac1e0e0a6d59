//! Per-compilation record of what the generated program must import.

/// Import path of the HTML escaping package.
pub const HTML_PACKAGE: &str = "html";
/// Import path of the formatted printing package.
pub const FMT_PACKAGE: &str = "fmt";

/// Collects imports while a template is being lowered.
///
/// One tracker belongs to one compilation. It is threaded through lowering
/// as `&mut Tracker` and read once by the program assembler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracker {
    pub uses_html: bool,
    pub uses_fmt: bool,
    packages: Vec<String>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user-declared package. Empty names and duplicates are
    /// ignored.
    pub fn add_package(&mut self, package: &str) {
        if package.is_empty() {
            tracing::trace!("ignoring import with an empty package name");
            return;
        }
        if !self.packages.iter().any(|p| p == package) {
            self.packages.push(package.to_string());
        }
    }

    /// User-declared packages in order of first appearance.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Every import the program needs besides `io`: `html`, then `fmt`,
    /// then user packages.
    ///
    /// A user package that repeats `html` or `fmt` is only listed once, since
    /// Go rejects duplicate imports.
    pub fn imports(&self) -> Vec<&str> {
        let mut imports = Vec::with_capacity(self.packages.len() + 2);
        if self.uses_html {
            imports.push(HTML_PACKAGE);
        }
        if self.uses_fmt {
            imports.push(FMT_PACKAGE);
        }
        for package in &self.packages {
            if package != "io" && !imports.contains(&package.as_str()) {
                imports.push(package.as_str());
            }
        }
        imports
    }
}
