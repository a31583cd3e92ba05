//! Demo of pose evaluation using dqskin
//!
//! Plays a short looping clip on a three bone arm and logs where each bone
//! ends up, switching from dual quaternions to matrices half way through.
//! Run with `RUST_LOG=info`. A model and options can be given as YAML files:
//! `cargo run --example walk -- model.yaml options.yaml`
use dqskin::{
    pose::PoseEvaluator,
    quat,
    skeleton::{
        AnimationKey, Bone, ModelData, ModelNode, NodeAnimation, SkinnedModel,
    },
    skin_error::SkinError,
    types::{PoseOptions, SkinningMethod},
};
use log::info;
use nalgebra_glm as glm;
use std::path::Path;

const SIM_RATE: f32 = 1.0 / 30.0;
const FRAMES: usize = 60;
const LOG_EVERY: usize = 10;
const UPPER_ARM: f32 = 12.0;
const FOREARM: f32 = 10.0;

fn main() -> Result<(), SkinError> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let model = match args.get(1) {
        Some(path) => SkinnedModel::load(Path::new(path))?,
        None => arm()?,
    };
    let options = match args.get(2) {
        Some(path) => PoseOptions::from_yaml(&std::fs::read_to_string(path)?)?,
        None => PoseOptions {
            time_scalar: 1.0,
            ..PoseOptions::default()
        },
    };
    info!("options={:?}", options);

    let lines = model.skeleton_lines();
    info!("Skeleton has {} line segments", lines.len() / 2);

    let mut evaluator = PoseEvaluator::new(&model, &options)?;
    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            evaluator.set_method(SkinningMethod::Matrix);
            info!("Switched to {:?}", evaluator.method());
        }
        evaluator.update(&model, SIM_RATE)?;
        if frame % LOG_EVERY != 0 {
            continue;
        }
        let pose = evaluator.pose();
        info!(
            "frame={} time={:.3} floats={}",
            frame,
            evaluator.time(),
            pose.bones.as_floats().len()
        );
        for (bone, m) in pose.debug.iter().enumerate() {
            info!(
                "  bone {} at ({:.2}, {:.2}, {:.2})",
                bone,
                m[(0, 3)],
                m[(1, 3)],
                m[(2, 3)]
            );
        }
    }

    Ok(())
}

/// Shoulder, elbow and wrist hanging down from a pivot at the shoulder
/// height. The elbow bends and the shoulder swings over the clip.
fn arm() -> Result<SkinnedModel, SkinError> {
    let x = glm::vec3(1.0f32, 0.0, 0.0);
    let z = glm::vec3(0.0f32, 0.0, 1.0);
    let shoulder_y = PoseOptions::default().root_offset_y;
    let duration = PoseOptions::default().clip_duration;

    let swing = NodeAnimation {
        translation_keys: vec![AnimationKey::translation(
            0.0,
            &glm::vec3(0.0, 0.0, 0.0),
        )],
        rotation_keys: vec![
            AnimationKey::rotation(0.0, &quat::from_axis_angle(&x, -0.4)),
            AnimationKey::rotation(
                duration * 0.5,
                &quat::from_axis_angle(&x, 0.4),
            ),
            AnimationKey::rotation(duration, &quat::from_axis_angle(&x, -0.4)),
        ],
    };
    let bend = NodeAnimation {
        translation_keys: vec![AnimationKey::translation(
            0.0,
            &glm::vec3(0.0, -UPPER_ARM, 0.0),
        )],
        rotation_keys: vec![
            AnimationKey::rotation(0.0, &quat::from_axis_angle(&z, 0.1)),
            AnimationKey::rotation(
                duration * 0.5,
                &quat::from_axis_angle(&z, 1.4),
            ),
            AnimationKey::rotation(duration, &quat::from_axis_angle(&z, 0.1)),
        ],
    };

    // Offsets move each bone's rest position back to the origin
    let rest = |y: f32| Bone {
        offset: glm::translation(&glm::vec3(0.0, -y, 0.0)),
    };

    SkinnedModel::new(ModelData {
        nodes: vec![
            ModelNode {
                name: "pivot".to_string(),
                children: vec![1],
                default_transform: glm::translation(&glm::vec3(
                    0.0, shoulder_y, 0.0,
                )),
                ..ModelNode::default()
            },
            ModelNode {
                name: "shoulder".to_string(),
                children: vec![2],
                animation: Some(0),
                bone: Some(0),
                ..ModelNode::default()
            },
            ModelNode {
                name: "elbow".to_string(),
                children: vec![3],
                animation: Some(1),
                bone: Some(1),
                ..ModelNode::default()
            },
            ModelNode {
                name: "wrist".to_string(),
                default_transform: glm::translation(&glm::vec3(
                    0.0, -FOREARM, 0.0,
                )),
                bone: Some(2),
                ..ModelNode::default()
            },
        ],
        animations: vec![swing, bend],
        bones: vec![
            rest(shoulder_y),
            rest(shoulder_y - UPPER_ARM),
            rest(shoulder_y - UPPER_ARM - FOREARM),
        ],
        ..ModelData::default()
    })
}
