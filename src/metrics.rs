//! Point-in-time host metrics for the pages.
//!
//! Every value is optional: a reading that cannot be taken is `None` and is
//! rendered as "N/A" rather than treated as an error.

use std::fs;
use std::net::{IpAddr, UdpSocket};
use std::path::{Path, PathBuf};

use sysinfo::{Disks, Networks, System, Users};

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const SYS_CLASS_NET: &str = "/sys/class/net";
/// Used only to pick the outbound interface; no packet is sent.
const ROUTE_PROBE: (&str, u16) = ("8.8.8.8", 80);
/// Processes using less resident memory than this are not listed.
const MIN_PROCESS_MEMORY_PERCENT: f32 = 0.05;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemSnapshot {
    pub ip: Option<IpAddr>,
    pub cpu_percent: Option<f32>,
    pub ram_percent: Option<f32>,
    /// Root filesystem.
    pub disk_percent: Option<f32>,
    pub temperature_celsius: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    /// `None` when no matching interface is up.
    pub interface: Option<InterfaceCounters>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEntry {
    /// Process name, prefixed with `user:` for non-root owners.
    pub label: String,
    pub memory_percent: f32,
}

pub trait MetricsProvider {
    fn system(&mut self) -> SystemSnapshot;
    fn network(&mut self) -> NetworkSnapshot;
    /// Up to `count` processes, highest resident memory first.
    fn top_processes(&mut self, count: usize) -> Vec<ProcessEntry>;
}

/// [`MetricsProvider`] backed by `sysinfo` and a few `/sys` files.
pub struct SystemMetricsProvider {
    system: System,
    interface_prefix: String,
    sys_class_net: PathBuf,
}

impl SystemMetricsProvider {
    pub fn new(interface_prefix: impl Into<String>) -> Self {
        let mut system = System::new();
        // CPU usage is a delta; prime the first sample.
        system.refresh_cpu_usage();
        Self {
            system,
            interface_prefix: interface_prefix.into(),
            sys_class_net: PathBuf::from(SYS_CLASS_NET),
        }
    }
}

impl MetricsProvider for SystemMetricsProvider {
    fn system(&mut self) -> SystemSnapshot {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu = self.system.global_cpu_usage();
        SystemSnapshot {
            ip: local_ip(),
            cpu_percent: cpu.is_finite().then_some(cpu),
            ram_percent: percent(self.system.used_memory(), self.system.total_memory()),
            disk_percent: root_disk_percent(),
            temperature_celsius: fs::read_to_string(THERMAL_ZONE)
                .ok()
                .as_deref()
                .and_then(parse_millidegrees),
        }
    }

    fn network(&mut self) -> NetworkSnapshot {
        let networks = Networks::new_with_refreshed_list();
        let list = networks.list();
        let mut names: Vec<&String> = list.keys().collect();
        names.sort();

        let interface = names
            .into_iter()
            .find(|name| {
                name.starts_with(&self.interface_prefix)
                    && interface_is_up(&self.sys_class_net, name)
            })
            .and_then(|name| {
                list.get(name.as_str()).map(|data| InterfaceCounters {
                    name: name.clone(),
                    bytes_sent: data.total_transmitted(),
                    bytes_received: data.total_received(),
                })
            });
        NetworkSnapshot { interface }
    }

    fn top_processes(&mut self, count: usize) -> Vec<ProcessEntry> {
        self.system.refresh_all();
        let users = Users::new_with_refreshed_list();

        let processes = self.system.processes().values().map(|process| {
            let user = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_string());
            RawProcess {
                name: process.name().to_string_lossy().into_owned(),
                user,
                resident_bytes: process.memory(),
            }
        });
        rank_processes(processes, self.system.total_memory(), count)
    }
}

/// Input to [`rank_processes`], decoupled from `sysinfo` types.
#[derive(Debug, Clone)]
pub struct RawProcess {
    pub name: String,
    pub user: Option<String>,
    pub resident_bytes: u64,
}

pub fn rank_processes(
    processes: impl IntoIterator<Item = RawProcess>,
    total_memory: u64,
    count: usize,
) -> Vec<ProcessEntry> {
    let mut entries: Vec<ProcessEntry> = processes
        .into_iter()
        .filter_map(|p| {
            let memory_percent = percent(p.resident_bytes, total_memory)?;
            if memory_percent <= MIN_PROCESS_MEMORY_PERCENT {
                return None;
            }
            let user = p.user.as_deref().unwrap_or("unknown");
            let label = if user == "root" {
                p.name
            } else {
                format!("{user}:{}", p.name)
            };
            Some(ProcessEntry {
                label,
                memory_percent,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.memory_percent.total_cmp(&a.memory_percent));
    entries.truncate(count);
    entries
}

fn percent(used: u64, total: u64) -> Option<f32> {
    (total > 0).then(|| (used as f64 / total as f64 * 100.0) as f32)
}

fn parse_millidegrees(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .map(|milli| milli as f32 / 1000.0)
}

fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

fn root_disk_percent() -> Option<f32> {
    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))?;
    let total = root.total_space();
    percent(total.saturating_sub(root.available_space()), total)
}

fn interface_is_up(sys_class_net: &Path, name: &str) -> bool {
    fs::read_to_string(sys_class_net.join(name).join("operstate"))
        .map(|state| state.trim() == "up")
        .unwrap_or(false)
}
