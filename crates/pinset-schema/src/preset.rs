use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub manifest: &'static str,
}

pub const BUILTIN_PRESETS: &[Preset] = &[
    Preset {
        name: "artiq-dev",
        description: "ARTIQ development metapackage with pinned OR1K toolchains",
        manifest: r#"[package]
name = "artiq-dev"
version = "5.0"

[build]
noarch = "python"
number = 0
string = "py_0"

[requirements]
run = [
  "python >=3.5.3,<3.6",
  "setuptools 33.1.1",
  "migen 0.8 py35_0",
  "misoc 0.11 py35_0",
  "jesd204b 0.10",
  "microscope",
  "binutils-or1k-linux >=2.27",
  "llvm-or1k 6.0.0",
  "llvmlite-artiq 0.23.0.dev py35_5",
  "rust-core-or1k 1.28.0 21",
  "openocd 0.10.0 6",
  "lit",
  "outputcheck",
  "coverage",
  "scipy",
  "numpy",
  "prettytable",
  "asyncserial",
  "sphinx 1.4.8",
  "sphinx-argparse",
  "sphinxcontrib-wavedrom",
  "sphinx_rtd_theme",
  "h5py 2.8",
  "python-dateutil",
  "pyqt >=5.5",
  "quamash",
  "pyqtgraph 0.10.0",
  "pygit2",
  "aiohttp >=3",
  "pythonparser >=1.1",
  "levenshtein",
]

[about]
home = "https://m-labs.hk/artiq"
license = "LGPL"
summary = "ARTIQ development metapackage"
"#,
    },
    Preset {
        name: "minimal",
        description: "Metapackage with no requirements",
        manifest: r#"[package]
name = "metapackage"
version = "0.1.0"

[build]
noarch = "generic"
number = 0

[requirements]
run = []
"#,
    },
];

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

pub fn list_presets() -> &'static [Preset] {
    BUILTIN_PRESETS
}
