use crate::error::{GaError, Result};
use serde::Serialize;

/// The thirteen classifiers the hyperparameter segment can target.
///
/// Each variant owns a static field layout; adding a classifier means adding
/// a table row below, not a branch anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClassifierId {
    Tree,
    RuleList,
    DecisionTable,
    Stump,
    MajorityRule,
    SingleRule,
    NeuralNet,
    Forest,
    Svm,
    RuleInduction,
    Logistic,
    LinearRegression,
    BayesNet,
}

impl ClassifierId {
    pub const ALL: [ClassifierId; 13] = [
        ClassifierId::Tree,
        ClassifierId::RuleList,
        ClassifierId::DecisionTable,
        ClassifierId::Stump,
        ClassifierId::MajorityRule,
        ClassifierId::SingleRule,
        ClassifierId::NeuralNet,
        ClassifierId::Forest,
        ClassifierId::Svm,
        ClassifierId::RuleInduction,
        ClassifierId::Logistic,
        ClassifierId::LinearRegression,
        ClassifierId::BayesNet,
    ];

    pub fn from_id(id: u32) -> Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(GaError::UnknownClassifier(id))
    }

    pub fn id(self) -> u32 {
        Self::ALL.iter().position(|&c| c == self).unwrap() as u32
    }

    pub fn layout(self) -> &'static [FieldDescriptor] {
        match self {
            ClassifierId::Tree => TREE_LAYOUT,
            ClassifierId::RuleList => RULE_LIST_LAYOUT,
            ClassifierId::DecisionTable => DECISION_TABLE_LAYOUT,
            ClassifierId::Stump => STUMP_LAYOUT,
            ClassifierId::MajorityRule => &[],
            ClassifierId::SingleRule => SINGLE_RULE_LAYOUT,
            ClassifierId::NeuralNet => NEURAL_NET_LAYOUT,
            ClassifierId::Forest => FOREST_LAYOUT,
            ClassifierId::Svm => SVM_LAYOUT,
            ClassifierId::RuleInduction => RULE_INDUCTION_LAYOUT,
            ClassifierId::Logistic => LOGISTIC_LAYOUT,
            ClassifierId::LinearRegression => &[],
            ClassifierId::BayesNet => BAYES_NET_LAYOUT,
        }
    }

    /// Width of the hyperparameter segment for this classifier.
    pub fn param_bits(self) -> usize {
        self.layout().iter().map(|f| f.width).sum()
    }
}

/// Rounding policy applied when an integer field is derived from the scaled
/// real value. Both policies occur in practice, so it is a per-field choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntPolicy {
    Round,
    Truncate,
}

/// Upper bound of a numeric field. A few bounds depend on the run, not on the
/// layout: they resolve through the [`DecodeContext`].
#[derive(Debug, Clone, Copy)]
pub enum Bound {
    Fixed(f64),
    /// Smallest instance count over the train/test fold pair.
    FoldInstanceMin,
    /// Number of candidate features in the run.
    FeatureCount,
}

impl Bound {
    fn resolve(self, ctx: &DecodeContext) -> f64 {
        match self {
            Bound::Fixed(v) => v,
            Bound::FoldInstanceMin => ctx.fold_instance_min as f64,
            Bound::FeatureCount => ctx.feature_count as f64,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Flag,
    /// Consumed but not emitted; keeps historical bit positions stable.
    Reserved,
    Real { lo: f64, hi: Bound },
    Int { lo: f64, hi: Bound, policy: IntPolicy },
}

/// One sub-field of a classifier's hyperparameter segment.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub width: usize,
    pub kind: FieldKind,
}

/// Run-dependent values needed to resolve dynamic field bounds.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub feature_count: usize,
    pub fold_instance_min: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Int(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperField {
    pub name: &'static str,
    pub value: ParamValue,
}

/// Interpret `bits` as an MSB-first unsigned integer `v` and scale it into
/// `[lo, hi)`: `lo + (hi - lo) * v / 2^n`. All-zero bits give exactly `lo`;
/// all-one bits stay strictly below `hi` since `(2^n - 1) / 2^n < 1`.
pub fn decode_real(bits: &[u8], lo: f64, hi: f64) -> f64 {
    let mut v = 0.0;
    for (i, &bit) in bits.iter().enumerate() {
        v += f64::from(bit) * 2f64.powi((bits.len() - 1 - i) as i32);
    }
    lo + (hi - lo) * v / 2f64.powi(bits.len() as i32)
}

pub fn decode_flag(bit: u8) -> bool {
    bit == 1
}

pub fn decode_int(bits: &[u8], lo: f64, hi: f64, policy: IntPolicy) -> i64 {
    let real = decode_real(bits, lo, hi);
    match policy {
        IntPolicy::Round => real.round() as i64,
        IntPolicy::Truncate => real.trunc() as i64,
    }
}

/// Decode a chromosome's hyperparameter segment into the typed record the
/// external evaluator consumes. The segment length must match the
/// classifier's layout exactly.
pub fn decode_params(
    classifier: ClassifierId,
    segment: &[u8],
    ctx: &DecodeContext,
) -> Result<Vec<HyperField>> {
    let layout = classifier.layout();
    let expected: usize = layout.iter().map(|f| f.width).sum();
    if segment.len() != expected {
        return Err(GaError::Configuration(format!(
            "Hyperparameter segment is {} bits, classifier {:?} expects {}",
            segment.len(),
            classifier,
            expected
        )));
    }

    let mut fields = Vec::with_capacity(layout.len());
    let mut offset = 0;
    for desc in layout {
        let bits = &segment[offset..offset + desc.width];
        offset += desc.width;

        let value = match desc.kind {
            FieldKind::Flag => ParamValue::Flag(decode_flag(bits[0])),
            FieldKind::Reserved => continue,
            FieldKind::Real { lo, hi } => ParamValue::Real(decode_real(bits, lo, hi.resolve(ctx))),
            FieldKind::Int { lo, hi, policy } => {
                ParamValue::Int(decode_int(bits, lo, hi.resolve(ctx), policy))
            }
        };
        fields.push(HyperField {
            name: desc.name,
            value,
        });
    }
    Ok(fields)
}

const fn flag(name: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        width: 1,
        kind: FieldKind::Flag,
    }
}

const fn real(name: &'static str, width: usize, lo: f64, hi: Bound) -> FieldDescriptor {
    FieldDescriptor {
        name,
        width,
        kind: FieldKind::Real { lo, hi },
    }
}

const fn int(
    name: &'static str,
    width: usize,
    lo: f64,
    hi: Bound,
    policy: IntPolicy,
) -> FieldDescriptor {
    FieldDescriptor {
        name,
        width,
        kind: FieldKind::Int { lo, hi, policy },
    }
}

const RESERVED_BIT: FieldDescriptor = FieldDescriptor {
    name: "_reserved",
    width: 1,
    kind: FieldKind::Reserved,
};

// 17 bits
const TREE_LAYOUT: &[FieldDescriptor] = &[
    flag("collapse_tree"),
    flag("unpruned"),
    flag("reduced_error_pruning"),
    flag("binary_splits"),
    flag("subtree_raising"),
    flag("use_laplace"),
    flag("use_mdl_correction"),
    flag("do_not_make_split_point_actual_value"),
    flag("save_instance_data"),
    flag("do_not_check_capabilities"),
    real("confidence_factor", 3, 0.0, Bound::Fixed(1.0)),
    int(
        "num_folds",
        4,
        2.0,
        Bound::FoldInstanceMin,
        IntPolicy::Truncate,
    ),
];

// 13 bits
const RULE_LIST_LAYOUT: &[FieldDescriptor] = &[
    flag("reduced_error_pruning"),
    flag("binary_splits"),
    flag("unpruned"),
    flag("use_mdl_correction"),
    flag("do_not_make_split_point_actual_value"),
    flag("do_not_check_capabilities"),
    real("confidence_factor", 3, 0.0, Bound::Fixed(1.0)),
    int(
        "num_folds",
        4,
        2.0,
        Bound::FoldInstanceMin,
        IntPolicy::Truncate,
    ),
];

// 6 bits
const DECISION_TABLE_LAYOUT: &[FieldDescriptor] = &[
    flag("use_ibk"),
    flag("display_rules"),
    flag("do_not_check_capabilities"),
    int(
        "cross_val",
        3,
        1.0,
        Bound::FoldInstanceMin,
        IntPolicy::Truncate,
    ),
];

// 1 bit
const STUMP_LAYOUT: &[FieldDescriptor] = &[flag("do_not_check_capabilities")];

// 4 bits
const SINGLE_RULE_LAYOUT: &[FieldDescriptor] = &[
    flag("do_not_check_capabilities"),
    int(
        "min_bucket_size",
        3,
        1.0,
        Bound::FeatureCount,
        IntPolicy::Truncate,
    ),
];

// 21 bits; one pad bit between the flags and the numeric fields
const NEURAL_NET_LAYOUT: &[FieldDescriptor] = &[
    flag("auto_build"),
    flag("nominal_to_binary"),
    flag("normalize_numeric_class"),
    flag("normalize_attributes"),
    flag("reset"),
    flag("decay"),
    flag("do_not_check_capabilities"),
    RESERVED_BIT,
    real("learning_rate", 2, 0.0, Bound::Fixed(1.0)),
    real("momentum", 3, 0.0, Bound::Fixed(1.0)),
    int(
        "validation_set_size",
        4,
        0.0,
        Bound::Fixed(100.0),
        IntPolicy::Truncate,
    ),
    int(
        "validation_threshold",
        4,
        1.0,
        Bound::Fixed(100.0),
        IntPolicy::Truncate,
    ),
];

// 23 bits
const FOREST_LAYOUT: &[FieldDescriptor] = &[
    flag("break_ties_randomly"),
    flag("do_not_check_capabilities"),
    flag("represent_copies_using_weights"),
    int(
        "bag_size_percent",
        4,
        10.0,
        Bound::Fixed(100.0),
        IntPolicy::Round,
    ),
    int(
        "num_iterations",
        4,
        0.0,
        Bound::Fixed(1000.0),
        IntPolicy::Round,
    ),
    int(
        "num_execution_slots",
        4,
        0.0,
        Bound::Fixed(100.0),
        IntPolicy::Round,
    ),
    int(
        "num_features",
        4,
        0.0,
        Bound::Fixed(100.0),
        IntPolicy::Round,
    ),
    int("max_depth", 4, 1.0, Bound::Fixed(100.0), IntPolicy::Round),
];

// 17 bits
const SVM_LAYOUT: &[FieldDescriptor] = &[
    flag("do_not_check_capabilities"),
    flag("build_calibration_models"),
    real("tolerance", 4, 1.0, Bound::Fixed(100.0)),
    real("epsilon", 4, 0.0, Bound::Fixed(100.0)),
    real("c", 4, 0.0, Bound::Fixed(100.0)),
    int(
        "num_folds",
        3,
        2.0,
        Bound::FoldInstanceMin,
        IntPolicy::Truncate,
    ),
];

// 14 bits
const RULE_INDUCTION_LAYOUT: &[FieldDescriptor] = &[
    flag("check_error_rate"),
    flag("use_pruning"),
    real("min_no", 4, 0.0, Bound::Fixed(100.0)),
    int("folds", 4, 2.0, Bound::FoldInstanceMin, IntPolicy::Truncate),
    int(
        "optimizations",
        4,
        0.0,
        Bound::Fixed(100.0),
        IntPolicy::Truncate,
    ),
];

// 10 bits
const LOGISTIC_LAYOUT: &[FieldDescriptor] = &[
    flag("do_not_check_capabilities"),
    flag("use_conjugate_gradient_descent"),
    real("ridge", 4, 0.0, Bound::Fixed(100.0)),
    int(
        "max_iterations",
        4,
        0.0,
        Bound::Fixed(1000.0),
        IntPolicy::Truncate,
    ),
];

// 2 bits
const BAYES_NET_LAYOUT: &[FieldDescriptor] = &[
    flag("use_ad_tree"),
    flag("do_not_check_capabilities"),
];
