//! Types that mirror the backend's JSON schema.
//!
//! Field decoding is lenient the same way the dashboard has always been:
//! a missing or null number reads as 0 and a missing label reads as "N/A".
//! A value of the wrong *kind* (an object where a number belongs, an object
//! where the process array belongs) still fails the whole snapshot.

use std::collections::BTreeMap;

use serde::Deserialize;

pub(crate) mod lenient {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        N(f64),
        S(String),
    }

    fn to_f64(v: Option<Num>) -> Option<f64> {
        let n = match v? {
            Num::N(n) => n,
            Num::S(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(to_f64(Option::<Num>::deserialize(d)?).unwrap_or(0.0))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(number(d)?.max(0.0) as u64)
    }

    pub fn signed<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(number(d)? as i64)
    }

    // pid is the row identity: accept "123" but never invent one
    pub fn pid<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let n = to_f64(Option::<Num>::deserialize(d)?)
            .ok_or_else(|| D::Error::custom("pid must be a number"))?;
        if n < 0.0 || n > u32::MAX as f64 {
            return Err(D::Error::custom(format!("pid out of range: {n}")));
        }
        Ok(n as u32)
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?
            .filter(|s| !s.is_empty())
            .unwrap_or_else(na))
    }

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    pub fn number_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
        let raw = Option::<BTreeMap<String, Option<Num>>>::deserialize(d)?.unwrap_or_default();
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, to_f64(v).unwrap_or(0.0)))
            .collect())
    }

    pub fn na() -> String {
        "N/A".into()
    }
}

// ---------- /api/cpu ----------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CoreUsage {
    #[serde(default, deserialize_with = "lenient::count")]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub usage_percent: f64,
}

impl CoreUsage {
    pub fn label(&self) -> String {
        match &self.name {
            Some(n) if !n.is_empty() => n.clone(),
            _ => format!("core{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CpuSnapshot {
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_usage_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_idle_percent: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub cores: Vec<CoreUsage>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub number_of_cores: u64,
}

// ---------- /api/memory ----------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MemoryStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub used_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub free_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MemorySnapshot {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub ram: MemoryStats,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub swap: MemoryStats,
}

// ---------- /api/processes ----------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ThreadInfo {
    #[serde(default, deserialize_with = "lenient::count")]
    pub tid: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cpu_usage: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessRecord {
    #[serde(deserialize_with = "lenient::pid")]
    pub pid: u32,
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub user_name: String,
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cpu_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub memory_rss_mb: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub threads: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub ppid: u64,
    #[serde(default, deserialize_with = "lenient::signed")]
    pub nice: i64,
    #[serde(default, deserialize_with = "lenient::signed")]
    pub priority: i64,
    #[serde(default)]
    pub command_line: Option<String>,
    #[serde(default)]
    pub executable_path: Option<String>,
    #[serde(default)]
    pub create_time_iso: Option<String>,
    #[serde(default, deserialize_with = "lenient::number_map")]
    pub memory_details_kb: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub threads_detailed_info: Vec<ThreadInfo>,
}

// ---------- /api/process/{pid}/io ----------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct IoStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub rchar: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub wchar: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub syscr: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub syscw: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub read_bytes: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub write_bytes: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub cancelled_write_bytes: u64,
}

/// Backends report open files either as bare paths or as `{fd, path}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OpenFile {
    Path(String),
    Entry {
        #[serde(default)]
        fd: Option<i64>,
        #[serde(default)]
        path: Option<String>,
    },
}

impl OpenFile {
    pub fn path(&self) -> &str {
        match self {
            OpenFile::Path(p) => p,
            OpenFile::Entry { path, .. } => path.as_deref().unwrap_or("?"),
        }
    }

    pub fn fd(&self) -> Option<i64> {
        match self {
            OpenFile::Path(_) => None,
            OpenFile::Entry { fd, .. } => *fd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProcessIo {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub io_stats: IoStats,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub open_files: Vec<OpenFile>,
}

// ---------- /api/filesystem ----------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Partition {
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub device: String,
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub mountpoint: String,
    #[serde(rename = "type", default = "lenient::na", deserialize_with = "lenient::text")]
    pub fs_type: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub used_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub free_gb: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub usage_percent: f64,
}

// ---------- /api/filesystem/directory ----------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirEntry {
    #[serde(default = "lenient::na", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_dir: bool,
    #[serde(default, deserialize_with = "lenient::count")]
    pub size: u64,
    #[serde(default)]
    pub size_human: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub contents: Vec<DirEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_payload_decodes() {
        let json = r#"{"overall_usage_percent":42.3,"cores":[{"id":0,"usage_percent":10},{"id":1,"usage_percent":74.6}]}"#;
        let cpu: CpuSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(cpu.overall_usage_percent, 42.3);
        assert_eq!(cpu.cores.len(), 2);
        assert_eq!(cpu.cores[1].usage_percent, 74.6);
        assert_eq!(cpu.number_of_cores, 0);
        assert_eq!(cpu.cores[0].label(), "core0");
    }

    #[test]
    fn process_fields_default_and_accept_strings() {
        let json = r#"[{"pid":"42","cpu_percent":null,"threads":"3","user_name":""}]"#;
        let procs: Vec<ProcessRecord> = serde_json::from_str(json).unwrap();
        let p = &procs[0];
        assert_eq!(p.pid, 42);
        assert_eq!(p.cpu_percent, 0.0);
        assert_eq!(p.threads, 3);
        assert_eq!(p.name, "N/A");
        assert_eq!(p.user_name, "N/A");
        assert!(p.memory_details_kb.is_empty());
    }

    #[test]
    fn process_without_pid_is_rejected() {
        let json = r#"[{"name":"init"}]"#;
        assert!(serde_json::from_str::<Vec<ProcessRecord>>(json).is_err());
    }

    #[test]
    fn wrong_top_level_shape_is_rejected() {
        assert!(serde_json::from_str::<Vec<ProcessRecord>>(r#"{"pid":1}"#).is_err());
        assert!(serde_json::from_str::<CpuSnapshot>(r#"{"overall_usage_percent":{}}"#).is_err());
    }

    #[test]
    fn memory_null_section_defaults() {
        let json = r#"{"ram":{"total_gb":16,"used_gb":4.5},"swap":null}"#;
        let m: MemorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(m.ram.used_gb, 4.5);
        assert_eq!(m.ram.usage_percent, 0.0);
        assert_eq!(m.swap, MemoryStats::default());
    }

    #[test]
    fn open_files_accept_both_shapes() {
        let json = r#"{"io_stats":{"rchar":10,"write_bytes":"2048"},"open_files":["/tmp/a",{"fd":3,"path":"/tmp/b"}]}"#;
        let io: ProcessIo = serde_json::from_str(json).unwrap();
        assert_eq!(io.io_stats.rchar, 10);
        assert_eq!(io.io_stats.write_bytes, 2048);
        assert_eq!(io.open_files[0].path(), "/tmp/a");
        assert_eq!(io.open_files[1].fd(), Some(3));
        assert_eq!(io.open_files[1].path(), "/tmp/b");
    }

    #[test]
    fn partition_type_is_renamed() {
        let json = r#"[{"device":"/dev/sda1","mountpoint":"/","type":"ext4","usage_percent":51.2}]"#;
        let parts: Vec<Partition> = serde_json::from_str(json).unwrap();
        assert_eq!(parts[0].fs_type, "ext4");
        assert_eq!(parts[0].total_gb, 0.0);
    }
}
