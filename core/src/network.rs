//! Production adapters for the collaborator ports: SSH sessions, ICMP
//! reachability and artifact archives.

pub mod archive;
pub mod icmp;
pub mod ssh;
