//! Function type productions.
//!
//! ```text
//! function-type ::= type params 'K'? 'Ya'? ('Yj' DIFF-KIND)? REPR
//! params ::= 'y'                                   // no parameters
//!        ::= type                                  // one plain parameter
//!        ::= param ('_' param*)? 't'
//! param ::= identifier? type PARAM-FLAG*
//! REPR ::= 'c' | 'Xe' | 'XB' | 'XC' | 'Xf'
//!
//! impl-function-type ::= type* 'I' CALLEE ('B' | 'C')? 'H'? PARAM-CONV*
//!                        ('r' RESULT-CONV)* ('zo')? '_'
//! ```

use quill_ir::{
    CalleeConvention, DifferentiabilityKind, FnParam, FunctionRepr, Idx, Name, ParamConvention,
    ParamFlags, ResultConvention, Tag,
};

use crate::{MangleError, Mangler};

impl Mangler<'_> {
    /// Append a function type; `labels` name its parameters by position
    /// when it is the type of a declaration.
    pub(crate) fn append_function_type(
        &mut self,
        ty: Idx,
        labels: &[Option<Name>],
    ) -> Result<(), MangleError> {
        let function = self
            .program
            .pool()
            .function_info(ty)
            .ok_or(MangleError::UnexpectedType {
                ty,
                expected: "a function type",
            })?;

        self.append_type(function.result)?;
        self.append_function_params(&function.params, labels)?;

        let ext = function.ext;
        if ext.throws {
            self.append_operator("K");
        }
        if ext.is_async {
            self.append_operator("Ya");
        }
        match ext.differentiability {
            DifferentiabilityKind::NonDifferentiable => {}
            DifferentiabilityKind::Normal => self.append_operator("Yjd"),
            DifferentiabilityKind::Linear => self.append_operator("Yjl"),
            DifferentiabilityKind::Forward => self.append_operator("Yjf"),
            DifferentiabilityKind::Reverse => self.append_operator("Yjr"),
        }
        self.append_operator(match ext.repr {
            FunctionRepr::Native => "c",
            FunctionRepr::NoEscape => "Xe",
            FunctionRepr::Block => "XB",
            FunctionRepr::CFunctionPointer => "XC",
            FunctionRepr::Thin => "Xf",
        });
        Ok(())
    }

    fn append_function_params(
        &mut self,
        params: &[FnParam],
        labels: &[Option<Name>],
    ) -> Result<(), MangleError> {
        let program = self.program;
        let label_of = |i: usize| labels.get(i).copied().flatten();

        match params {
            [] => {
                self.append_operator("y");
                return Ok(());
            }
            [only]
                if label_of(0).is_none()
                    && only.flags.is_empty()
                    && program.pool().tag(only.ty) != Tag::Tuple =>
            {
                return self.append_type(only.ty);
            }
            _ => {}
        }

        for (i, param) in params.iter().enumerate() {
            if let Some(label) = label_of(i) {
                self.append_identifier(program.name_text(label));
            }
            self.append_type(param.ty)?;
            self.append_param_flags(param.flags);
            if i == 0 {
                self.append_operator("_");
            }
        }
        self.append_operator("t");
        Ok(())
    }

    fn append_param_flags(&mut self, flags: ParamFlags) {
        if flags.contains(ParamFlags::INOUT) {
            self.append_operator("z");
        }
        if flags.contains(ParamFlags::OWNED) {
            self.append_operator("n");
        }
        if flags.contains(ParamFlags::SHARED) {
            self.append_operator("h");
        }
        if flags.contains(ParamFlags::VARIADIC) {
            self.append_operator("d");
        }
        if flags.contains(ParamFlags::AUTOCLOSURE) {
            self.append_operator("Xk");
        }
    }

    pub(crate) fn append_impl_function_type(&mut self, ty: Idx) -> Result<(), MangleError> {
        let function = self
            .program
            .pool()
            .impl_function_info(ty)
            .ok_or(MangleError::UnexpectedType {
                ty,
                expected: "a lowered function type",
            })?;

        for param in &function.params {
            self.append_type(param.ty)?;
        }
        for result in &function.results {
            self.append_type(result.ty)?;
        }
        if let Some(error) = function.error {
            self.append_type(error)?;
        }

        self.append_operator("I");
        self.append_operator(match function.callee {
            CalleeConvention::Thin => "t",
            CalleeConvention::Owned => "x",
            CalleeConvention::Guaranteed => "g",
        });
        match function.repr {
            FunctionRepr::Block => self.append_operator("B"),
            FunctionRepr::CFunctionPointer => self.append_operator("C"),
            _ => {}
        }
        if function.is_async {
            self.append_operator("H");
        }
        for param in &function.params {
            self.append_operator(match param.convention {
                ParamConvention::Indirect => "n",
                ParamConvention::Inout => "l",
                ParamConvention::Owned => "x",
                ParamConvention::Guaranteed => "g",
            });
        }
        for result in &function.results {
            self.append_operator(match result.convention {
                ResultConvention::Indirect => "rr",
                ResultConvention::Owned => "ro",
                ResultConvention::Unowned => "rd",
            });
        }
        if function.error.is_some() {
            self.append_operator("zo");
        }
        self.append_operator("_");
        Ok(())
    }
}
