use std::io;

/// Best-effort opener for the authorization URL.
pub trait BrowserLauncher {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs in the user's default browser.
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

impl<F> BrowserLauncher for F
where
    F: Fn(&str) -> io::Result<()>,
{
    fn open(&self, url: &str) -> io::Result<()> {
        self(url)
    }
}
