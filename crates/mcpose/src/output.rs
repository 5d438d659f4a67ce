use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use glam::{Quat, Vec3};
use mcpose_frame::ParsedMessage;
use mcpose_receiver::CycleReport;
use mcpose_skeleton::{joint_for_bone, Joint, Skeleton};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct BoneOutput {
    bone_id: i16,
    joint: Option<Joint>,
    rotation: [f32; 4],
    position: [f32; 3],
}

#[derive(Serialize)]
struct DecodeOutput {
    kind: &'static str,
    boxes_visited: usize,
    truncated: bool,
    bones: Vec<BoneOutput>,
}

#[derive(Serialize)]
struct PoseOutput<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<CycleOutput>,
    timestamp: String,
    pose: &'a Skeleton,
}

#[derive(Serialize)]
struct CycleOutput {
    datagrams: usize,
    frames: usize,
    rejected: usize,
    stale: usize,
    bones_applied: usize,
    bones_skipped: usize,
}

impl From<&CycleReport> for CycleOutput {
    fn from(r: &CycleReport) -> Self {
        Self {
            datagrams: r.datagrams,
            frames: r.frames,
            rejected: r.rejected,
            stale: r.stale,
            bones_applied: r.bones_applied,
            bones_skipped: r.bones_skipped,
        }
    }
}

/// Print the bone transforms of one decoded datagram.
pub fn print_bones(parsed: &ParsedMessage, format: OutputFormat) {
    let bones: Vec<BoneOutput> = parsed
        .bones
        .iter()
        .map(|b| BoneOutput {
            bone_id: b.bone_id,
            joint: joint_for_bone(b.bone_id),
            rotation: b.rotation.to_array(),
            position: b.position.to_array(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = DecodeOutput {
                kind: "bones",
                boxes_visited: parsed.boxes_visited,
                truncated: parsed.truncated,
                bones,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BONE", "JOINT", "ROTATION (xyzw)", "POSITION (xyz)"]);
            for bone in &bones {
                table.add_row(vec![
                    bone.bone_id.to_string(),
                    joint_label(bone.joint),
                    fmt_floats(&bone.rotation),
                    fmt_floats(&bone.position),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for bone in &bones {
                println!(
                    "bone={} joint={} rotation={} position={}",
                    bone.bone_id,
                    joint_label(bone.joint),
                    fmt_floats(&bone.rotation),
                    fmt_floats(&bone.position)
                );
            }
        }
    }
}

/// Print the full skeleton pose, optionally with the cycle that produced it.
pub fn print_pose(skeleton: &Skeleton, cycle: Option<&CycleReport>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PoseOutput {
                kind: "pose",
                cycle: cycle.map(CycleOutput::from),
                timestamp: now_unix_millis(),
                pose: skeleton,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["JOINT", "ROTATION (xyzw)", "POSITION (xyz)"]);
            for (joint, pose) in skeleton.iter() {
                table.add_row(vec![
                    joint.to_string(),
                    fmt_quat(pose.rotation),
                    fmt_vec3(pose.position),
                ]);
            }
            if let Some(c) = cycle {
                println!(
                    "datagrams={} frames={} rejected={} stale={}",
                    c.datagrams, c.frames, c.rejected, c.stale
                );
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if let Some(c) = cycle {
                println!(
                    "cycle datagrams={} frames={} rejected={} stale={} applied={} skipped={}",
                    c.datagrams, c.frames, c.rejected, c.stale, c.bones_applied, c.bones_skipped
                );
            }
            for (joint, pose) in skeleton.iter() {
                println!(
                    "{joint:<16} rotation={} position={}",
                    fmt_quat(pose.rotation),
                    fmt_vec3(pose.position)
                );
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn joint_label(joint: Option<Joint>) -> String {
    joint.map_or_else(|| "-".to_string(), |j| j.to_string())
}

fn fmt_quat(q: Quat) -> String {
    fmt_floats(&q.to_array())
}

fn fmt_vec3(v: Vec3) -> String {
    fmt_floats(&v.to_array())
}

fn fmt_floats(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    format!("({})", parts.join(", "))
}

fn now_unix_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
