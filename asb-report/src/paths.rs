use std::path::{Path, PathBuf};

/// One authenticated-storage benchmark run.
#[derive(Debug, Clone)]
pub struct AsbRun {
    pub authdb: String,
    pub keys: String,
    pub folder: String,
    pub low_mem: bool,
    pub high_mem: u32,
}

impl AsbRun {
    pub fn new(authdb: &str, keys: &str, folder: &str) -> Self {
        Self {
            authdb: authdb.to_string(),
            keys: keys.to_string(),
            folder: folder.to_string(),
            low_mem: false,
            high_mem: 0,
        }
    }

    fn dir(&self, base: &Path) -> PathBuf { base.join("paper_experiment").join(&self.folder) }

    pub fn time_log(&self, base: &Path) -> PathBuf {
        let suffix = if self.low_mem {
            "_lowmem".to_string()
        } else if self.high_mem > 0 {
            format!("_highmem{}", self.high_mem)
        } else {
            String::new()
        };
        self.dir(base)
            .join(format!("time_{}_{}{}.log", self.authdb, self.keys, suffix))
    }

    pub fn stat_log(&self, base: &Path) -> PathBuf {
        self.dir(base)
            .join(format!("stat_{}_{}.log", self.authdb, self.keys))
    }
}

/// One end-to-end run of the full node.
#[derive(Debug, Clone)]
pub struct E2eRun {
    pub authdb: String,
    pub size: String,
    pub erc20: bool,
    pub folder: String,
}

impl E2eRun {
    pub fn metrics_log(&self, base: &Path) -> PathBuf {
        let task = if self.erc20 { "erc20" } else { "native" };
        base.join("experiment_data")
            .join("metrics")
            .join(&self.folder)
            .join(format!("less-sender-{}-{}-{}.log", task, self.authdb, self.size))
    }
}
