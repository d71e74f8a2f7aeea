pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
