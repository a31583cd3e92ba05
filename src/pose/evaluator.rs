use super::{
    buffer::{BoneOutput, BoneTransforms},
    clock::{self, AnimationClock},
};
use crate::{
    animation,
    dualquat::DualQuat,
    skeleton::SkinnedModel,
    skin_error::SkinError,
    transform::{self, RigidTransform},
    types::{PoseOptions, SkinningMethod},
};
use log::{debug, trace};
use nalgebra_glm as glm;
use smallvec::{smallvec, SmallVec};

/// Node index paired with the cumulative transform of its parent
type Level<T> = SmallVec<[(usize, T); 16]>;

/// Evaluated bone transforms for one frame, borrowed from the evaluator until
/// the next evaluation
#[derive(Clone, Copy, Debug)]
pub struct Pose<'a> {
    /// Skinning transforms, one per bone
    pub bones: BoneOutput<'a>,
    /// Bone space to model space matrices (without the bone offset), one per
    /// bone, for drawing the skeleton
    pub debug: &'a [glm::Mat4],
}

/// Walks the node tree one level at a time from the root, writing skinning
/// and debug transforms for every node that has a bone.
///
/// # Errors
/// Returns `SkinError` if a node refers to a bone slot outside the buffers or
/// an animation without keys. Buffers may be partly written in that case.
pub fn evaluate<T: RigidTransform>(
    model: &SkinnedModel,
    time: f32,
    root_inverse: &glm::Mat4,
    bones: &mut BoneTransforms<T>,
    debug: &mut BoneTransforms<glm::Mat4>,
) -> Result<(), SkinError> {
    let nodes = model.nodes();
    let animations = model.animations();
    let offsets = model.bones();
    let root_inverse = T::from_mat4(root_inverse);

    if nodes.is_empty() {
        return Err(SkinError::NoRootNode);
    }

    let mut breadth: Level<T> = smallvec![(0, T::identity())];
    while !breadth.is_empty() {
        let mut children = Level::<T>::new();

        for &(node_index, parent) in &breadth {
            let node = &nodes[node_index];

            let local = match node.animation {
                Some(a) => {
                    let anim = animations.get(a).ok_or(
                        SkinError::AnimationIndexOutOfRange {
                            node: node_index,
                            animation: a,
                        },
                    )?;
                    animation::animated_transform::<T>(anim, time)
                        .ok_or(SkinError::NoKeyframes(a))?
                }
                None => T::from_mat4(&node.default_transform),
            };
            let cumulative = parent.compose(&local);

            if let Some(bone) = node.bone {
                let out_of_range = move || SkinError::BoneIndexOutOfRange {
                    node: node_index,
                    bone,
                };
                let offset = offsets.get(bone).ok_or_else(out_of_range)?;
                let posed = root_inverse.compose(&cumulative);
                *bones.get_mut(bone).ok_or_else(out_of_range)? =
                    posed.compose(&T::from_mat4(&offset.offset));
                *debug.get_mut(bone).ok_or_else(out_of_range)? =
                    posed.to_mat4();
            }

            for &child in &node.children {
                if child >= nodes.len() {
                    return Err(SkinError::ChildIndexOutOfRange {
                        node: node_index,
                        child,
                    });
                }
                children.push((child, cumulative));
            }
        }

        breadth = children;
    }

    Ok(())
}

/// Owns the clip clock and the output buffers for one model
#[derive(Clone, Debug)]
pub struct PoseEvaluator {
    clock: AnimationClock,
    method: SkinningMethod,
    /// Representation held by the buffers `pose` returns
    evaluated: SkinningMethod,
    root_inverse: glm::Mat4,
    matrices: BoneTransforms<glm::Mat4>,
    dual_quats: BoneTransforms<DualQuat>,
    debug: BoneTransforms<glm::Mat4>,
}

impl PoseEvaluator {
    /// Creates an evaluator with buffers sized for `model`
    ///
    /// # Errors
    /// Returns `SkinError` for an invalid clip duration or a model with too
    /// many bones
    pub fn new(
        model: &SkinnedModel,
        options: &PoseOptions,
    ) -> Result<Self, SkinError> {
        let count = model.bone_count();
        debug!(
            "PoseEvaluator bones={} method={:?} duration={}",
            count, options.method, options.clip_duration
        );
        Ok(Self {
            clock: AnimationClock::new(
                options.clip_duration,
                options.time_scalar,
            )?,
            method: options.method,
            evaluated: options.method,
            root_inverse: transform::translation(&glm::vec3(
                0.0,
                -options.root_offset_y,
                0.0,
            )),
            matrices: BoneTransforms::new(count)?,
            dual_quats: BoneTransforms::new(count)?,
            debug: BoneTransforms::new(count)?,
        })
    }

    #[must_use]
    pub const fn method(&self) -> SkinningMethod {
        self.method
    }

    /// Selects the representation used by following evaluations. `pose`
    /// keeps returning the previous representation until then.
    pub fn set_method(&mut self, method: SkinningMethod) {
        self.method = method;
    }

    pub fn set_time_scalar(&mut self, scalar: f32) {
        self.clock.set_scalar(scalar);
    }

    /// Current clip time
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Advances the clip by `delta_time` (scaled by the time scalar) and
    /// evaluates the pose there
    ///
    /// # Errors
    /// May return `SkinError`
    pub fn update(
        &mut self,
        model: &SkinnedModel,
        delta_time: f32,
    ) -> Result<Pose<'_>, SkinError> {
        let time = self.clock.advance(delta_time);
        trace!("update delta_time={} time={}", delta_time, time);
        self.evaluate(model, time)
    }

    /// Evaluates the pose at `time` (wrapped into the clip) without moving
    /// the clock
    ///
    /// # Errors
    /// May return `SkinError`
    pub fn evaluate_at(
        &mut self,
        model: &SkinnedModel,
        time: f32,
    ) -> Result<Pose<'_>, SkinError> {
        let time = clock::wrap(time, self.clock.duration());
        self.evaluate(model, time)
    }

    /// The most recently evaluated pose, in the representation it was
    /// evaluated with
    #[must_use]
    pub fn pose(&self) -> Pose<'_> {
        let bones = match self.evaluated {
            SkinningMethod::Matrix => {
                BoneOutput::Matrix(self.matrices.as_slice())
            }
            SkinningMethod::DualQuat => {
                BoneOutput::DualQuat(self.dual_quats.as_slice())
            }
        };
        Pose {
            bones,
            debug: self.debug.as_slice(),
        }
    }

    fn evaluate(
        &mut self,
        model: &SkinnedModel,
        time: f32,
    ) -> Result<Pose<'_>, SkinError> {
        if model.bone_count() != self.debug.len() {
            return Err(SkinError::BoneCountMismatch {
                expected: self.debug.len(),
                found: model.bone_count(),
            });
        }
        self.evaluated = self.method;
        match self.method {
            SkinningMethod::Matrix => evaluate(
                model,
                time,
                &self.root_inverse,
                &mut self.matrices,
                &mut self.debug,
            )?,
            SkinningMethod::DualQuat => evaluate(
                model,
                time,
                &self.root_inverse,
                &mut self.dual_quats,
                &mut self.debug,
            )?,
        }
        Ok(self.pose())
    }
}
