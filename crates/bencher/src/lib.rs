/// A named argument list handed to an encoder benchmark.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    args: &'static [&'static str],
}

impl TestCase {
    pub const fn new(name: &'static str, args: &'static [&'static str]) -> Self {
        Self { name, args }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// owned copy of the arguments, as a command line would hand them over
    pub fn args(&self) -> Vec<String> {
        self.args.iter().map(ToString::to_string).collect()
    }
}
