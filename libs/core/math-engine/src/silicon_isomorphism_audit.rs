/**
 * =================================================================
 * APARATO: SILICON ISOMORPHISM AUDIT (L1-MATH-CERT)
 * RESPONSABILIDAD: Validación de paridad Escalar vs SIMD 4-Way.
 * =================================================================
 */
 use prospector_core_math::prelude::*;

 #[test]
 fn certify_simd_isomorphism_bit_perfect() {
     println!("\n🧬 [AUDIT]: Initiating SIMD 4-Way Isomorphism...");
 
     let p0 = JacobianPoint::from_affine([1,0,0,0], [2,0,0,0]);
     let p1 = JacobianPoint::from_affine([3,0,0,0], [4,0,0,0]);
     let p2 = JacobianPoint::from_affine([5,0,0,0], [6,0,0,0]);
     let p3 = JacobianPoint::from_affine([7,0,0,0], [8,0,0,0]);
 
     let mut vector_unit = JacobianPointVector4::from_elements(&p0, &p1, &p2, &p3);
     vector_unit.double_batch_unified();
 
     let oracle_results = [
         UnifiedCurveEngine::double_point_jacobian(&p0),
         UnifiedCurveEngine::double_point_jacobian(&p1),
         UnifiedCurveEngine::double_point_jacobian(&p2),
         UnifiedCurveEngine::double_point_jacobian(&p3),
     ];
 
     for i in 0..4 {
         let simd_x = vector_unit.x.extract_and_reduce_lane(i);
         assert_eq!(simd_x, oracle_results[i].x, "L1_SIMD_FAULT: Lane {} drift.", i);
     }
 
     println!("   ✅ Silicon Isomorphism: Scalar vs AVX2 Parity Certified.");
 }