use crate::rsa::errors::Result;
use crate::rsa::keys::KeyData;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub public: KeyData,
    pub private: KeyData,
}

pub fn public_path(path: &str) -> String {
    path.to_string() + ".pub"
}

impl KeyPair {
    /// Private half at `path`, public half at `path.pub`.
    pub fn load(path: &str) -> Result<Self> {
        Ok(Self { public: KeyData::load(&public_path(path))?, private: KeyData::load(path)? })
    }

    pub fn save(&self, path: &str) -> Result<()> {
        self.public.save(&public_path(path))?;
        self.private.save(path)?;
        Ok(())
    }
}
