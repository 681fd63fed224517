//! Deployment mode and project selection passed into the converter.

/// How rendered pages are addressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum RenderMode {
    /// Served from a web root: `help.txt` is addressed as `/`.
    #[default]
    Online,
    /// Static files on disk: every document is `<file>.html`.
    Offline,
}

impl RenderMode {
    /// HTML destination of a help file under this mode.
    #[must_use]
    pub fn html_destination(self, filename: &str) -> String {
        match self {
            Self::Online if filename == HELP_FILE => "/".to_owned(),
            _ => format!("{filename}.html"),
        }
    }

    /// Prefix for stylesheet and script references.
    #[must_use]
    pub fn static_dir(self) -> &'static str {
        match self {
            Self::Online => "/",
            Self::Offline => "",
        }
    }

    /// Link target of the help overview page.
    #[must_use]
    pub fn help_link(self) -> &'static str {
        match self {
            Self::Online => "./",
            Self::Offline => "help.txt.html",
        }
    }
}

/// Name of the canonical entry document.
pub const HELP_FILE: &str = "help.txt";

/// Which documentation set is being rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Project {
    #[default]
    Vim,
    Neovim,
}

impl Project {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Vim => "Vim",
            Self::Neovim => "Neovim",
        }
    }

    /// Name used when pointing readers at this project from its sibling.
    #[must_use]
    pub fn contrasted_name(self) -> &'static str {
        match self {
            Self::Vim => "the original Vim",
            Self::Neovim => "Neovim",
        }
    }

    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Self::Vim => "https://www.vim.org/",
            Self::Neovim => "https://neovim.io/",
        }
    }

    /// Host serving the rendered help for this project.
    #[must_use]
    pub fn vimdoc_site(self) -> &'static str {
        match self {
            Self::Vim => "vimhelp.org",
            Self::Neovim => "neo.vimhelp.org",
        }
    }

    #[must_use]
    pub fn doc_src_url(self) -> &'static str {
        match self {
            Self::Vim => "https://github.com/vim/vim/tree/master/runtime/doc",
            Self::Neovim => "https://github.com/neovim/neovim/tree/master/runtime/doc",
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Vim => Self::Neovim,
            Self::Neovim => Self::Vim,
        }
    }
}

/// Settings the caller hands to the converter.
#[derive(Clone, Debug, Default)]
pub struct ConverterOptions {
    pub mode: RenderMode,
    pub project: Project,
    /// Version label for page assembly; the converter itself ignores it.
    pub version: Option<String>,
}
